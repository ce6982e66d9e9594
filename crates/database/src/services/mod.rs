pub mod course;
pub mod query_course;
