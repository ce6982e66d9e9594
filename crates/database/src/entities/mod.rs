pub mod course;
pub mod course_tag;
pub mod faculty;
pub mod review;
