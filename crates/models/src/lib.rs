pub mod course_category;
pub mod course_query;
pub mod course_record;
pub mod pagination;
pub mod rating;
pub mod sort_policy;
