use crate::{
    course_category::{Category, GradingType},
    rating::ReviewStats,
};

/// A course as the repository hands it over: stored fields, joined faculty
/// fields, ordered tags, and the rating of every review
#[derive(Debug, Clone, PartialEq)]
pub struct CourseRecord {
    pub id: i32,
    /// Unique course code (e.g., "EN811301")
    pub code: String,
    pub name_th: String,
    pub name_en: Option<String>,
    pub category: Category,
    pub grading_type: GradingType,
    pub faculty_id: Option<i32>,
    pub faculty_name_th: Option<String>,
    pub faculty_name_en: Option<String>,
    pub faculty_color: Option<String>,
    /// In insertion order
    pub tags: Vec<String>,
    /// One entry per review, `None` for reviews without a rating
    pub ratings: Vec<Option<i32>>,
}

/// A course with its review statistics, as listed to users
#[derive(Debug, Clone, PartialEq)]
pub struct CourseSummary {
    pub id: i32,
    pub code: String,
    pub name_th: String,
    pub name_en: Option<String>,
    pub faculty_id: Option<i32>,
    pub faculty_name_th: Option<String>,
    pub faculty_name_en: Option<String>,
    pub faculty_color: Option<String>,
    pub tags: Vec<String>,
    pub avg_rating: f64,
    pub review_count: u64,
}

impl From<CourseRecord> for CourseSummary {
    fn from(record: CourseRecord) -> Self {
        let stats = ReviewStats::from_ratings(&record.ratings);

        Self {
            id: record.id,
            code: record.code,
            name_th: record.name_th,
            name_en: record.name_en,
            faculty_id: record.faculty_id,
            faculty_name_th: record.faculty_name_th,
            faculty_name_en: record.faculty_name_en,
            faculty_color: record.faculty_color,
            tags: record.tags,
            avg_rating: stats.avg_rating,
            review_count: stats.review_count,
        }
    }
}
