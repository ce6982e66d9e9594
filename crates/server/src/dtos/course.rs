use chrono::NaiveDateTime;
use database::{entities::faculty, services::query_course::CourseDetail};
use models::{
    course_category::{Category, GradingType},
    course_query::{CourseQuery, RawCourseQuery},
    course_record::CourseSummary,
    pagination::Page,
    rating::ReviewStats,
    sort_policy::SortPolicy,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: i32,
    pub code: String,
    #[serde(rename = "nameTH")]
    pub name_th: String,
    #[serde(rename = "nameEN")]
    pub name_en: Option<String>,
    pub faculty_id: Option<i32>,
    #[serde(rename = "facultyNameTH")]
    pub faculty_name_th: Option<String>,
    #[serde(rename = "facultyNameEN")]
    pub faculty_name_en: Option<String>,
    pub faculty_color: Option<String>,
    pub tags: Vec<String>,
    pub avg_rating: f64,
    pub review_count: u64,
}

impl From<CourseSummary> for CourseResponse {
    fn from(course: CourseSummary) -> Self {
        Self {
            id: course.id,
            code: course.code,
            name_th: course.name_th,
            name_en: course.name_en,
            faculty_id: course.faculty_id,
            faculty_name_th: course.faculty_name_th,
            faculty_name_en: course.faculty_name_en,
            faculty_color: course.faculty_color,
            tags: course.tags,
            avg_rating: course.avg_rating,
            review_count: course.review_count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedCoursesResponse {
    pub courses: Vec<CourseResponse>,
    pub total_count: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

impl From<Page<CourseSummary>> for PaginatedCoursesResponse {
    fn from(page: Page<CourseSummary>) -> Self {
        Self {
            courses: page.items.into_iter().map(CourseResponse::from).collect(),
            total_count: page.total_count,
            total_pages: page.total_pages,
            current_page: page.current_page,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: i32,
    pub rating: Option<i32>,
    pub content: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetailResponse {
    #[serde(flatten)]
    pub course: CourseResponse,
    pub category: String,
    pub grading_type: String,
    /// Newest first
    pub reviews: Vec<ReviewResponse>,
}

impl From<CourseDetail> for CourseDetailResponse {
    fn from(detail: CourseDetail) -> Self {
        let ratings: Vec<Option<i32>> = detail.reviews.iter().map(|r| r.rating).collect();
        let stats = ReviewStats::from_ratings(&ratings);
        let CourseDetail {
            course,
            faculty,
            tags,
            reviews,
        } = detail;

        let (faculty_name_th, faculty_name_en, faculty_color) = match faculty {
            Some(faculty) => (Some(faculty.name_th), Some(faculty.name_en), faculty.color),
            None => (None, None, None),
        };

        Self {
            course: CourseResponse {
                id: course.id,
                code: course.code,
                name_th: course.name_th,
                name_en: course.name_en,
                faculty_id: course.faculty_id,
                faculty_name_th,
                faculty_name_en,
                faculty_color,
                tags,
                avg_rating: stats.avg_rating,
                review_count: stats.review_count,
            },
            category: course.category.to_string(),
            grading_type: course.grading_type.to_string(),
            reviews: reviews
                .into_iter()
                .map(|review| ReviewResponse {
                    id: review.id,
                    rating: review.rating,
                    content: review.content,
                    created_at: review.created_at,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacultyResponse {
    pub id: i32,
    #[serde(rename = "nameTH")]
    pub name_th: String,
    #[serde(rename = "nameEN")]
    pub name_en: String,
    pub color: Option<String>,
}

impl From<faculty::Model> for FacultyResponse {
    fn from(faculty: faculty::Model) -> Self {
        Self {
            id: faculty.id,
            name_th: faculty.name_th,
            name_en: faculty.name_en,
            color: faculty.color,
        }
    }
}

/// Everything the search form can filter or sort by
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseFiltersResponse {
    pub faculties: Vec<FacultyResponse>,
    pub categories: Vec<String>,
    pub grading_types: Vec<String>,
    pub sort_policies: Vec<String>,
}

impl CourseFiltersResponse {
    pub fn new(faculties: Vec<faculty::Model>) -> Self {
        Self {
            faculties: faculties.into_iter().map(FacultyResponse::from).collect(),
            categories: Category::all().iter().map(|c| c.to_string()).collect(),
            grading_types: GradingType::all().iter().map(|g| g.to_string()).collect(),
            sort_policies: SortPolicy::all().iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Course listing query. Every value is optional and values that do not
/// parse are ignored rather than rejected.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CourseQueryParams {
    /// Matches the Thai name, English name or code, case-insensitively
    pub query: Option<String>,
    /// GENERAL, MAJOR, ELECTIVE or FREE_ELECTIVE
    pub category: Option<String>,
    /// NORM or CRITERION
    pub grading_type: Option<String>,
    pub faculty_id: Option<String>,
    /// Minimum average rating, 1 to 5
    pub min_rating: Option<String>,
    /// `true` keeps only reviewed courses
    pub has_reviews: Option<String>,
    /// reviews_desc (default), rating_desc, rating_asc, name_asc, name_desc or code_asc
    pub sort_by: Option<String>,
    /// 1-indexed page number
    pub page: Option<String>,
}

impl CourseQueryParams {
    pub fn to_query(&self) -> CourseQuery {
        CourseQuery::from_raw(RawCourseQuery {
            query: self.query.as_deref(),
            category: self.category.as_deref(),
            grading_type: self.grading_type.as_deref(),
            faculty_id: self.faculty_id.as_deref(),
            min_rating: self.min_rating.as_deref(),
            has_reviews: self.has_reviews.as_deref(),
            sort_by: self.sort_by.as_deref(),
            page: self.page.as_deref(),
        })
    }
}
