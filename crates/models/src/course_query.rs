use crate::{
    course_category::{Category, GradingType},
    course_record::CourseSummary,
    sort_policy::SortPolicy,
};

/// Predicates the repository evaluates against stored course fields.
/// Every supplied predicate must hold; `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFilter {
    /// Case-insensitive substring of the Thai name, English name, or code
    pub query: Option<String>,
    pub category: Option<Category>,
    pub grading_type: Option<GradingType>,
    pub faculty_id: Option<i32>,
}

impl CourseFilter {
    /// The free-text query, if it has any content once trimmed
    pub fn search_term(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

/// Predicates on aggregated values, applied after the repository read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Keep only courses with at least one review
    pub has_reviews: bool,
    /// Keep only courses whose average rating reaches this value
    pub min_rating: Option<i32>,
}

impl PostFilter {
    pub fn accepts(&self, course: &CourseSummary) -> bool {
        if self.has_reviews && course.review_count == 0 {
            return false;
        }

        match self.min_rating {
            Some(min) if min > 0 => course.avg_rating >= f64::from(min),
            _ => true,
        }
    }

    pub fn apply(&self, courses: Vec<CourseSummary>) -> Vec<CourseSummary> {
        courses
            .into_iter()
            .filter(|course| self.accepts(course))
            .collect()
    }
}

/// A fully parsed course discovery request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseQuery {
    pub filter: CourseFilter,
    pub post_filter: PostFilter,
    pub sort_by: SortPolicy,
    /// 1-indexed
    pub page: u64,
}

impl Default for CourseQuery {
    fn default() -> Self {
        Self {
            filter: CourseFilter::default(),
            post_filter: PostFilter::default(),
            sort_by: SortPolicy::default(),
            page: 1,
        }
    }
}

impl CourseQuery {
    /// Builds a query from raw request values. Anything that does not parse
    /// is treated as absent, and pages below 1 become page 1.
    pub fn from_raw(raw: RawCourseQuery<'_>) -> Self {
        Self {
            filter: CourseFilter {
                query: raw.query.map(str::to_string),
                category: raw.category.and_then(|s| s.trim().parse().ok()),
                grading_type: raw.grading_type.and_then(|s| s.trim().parse().ok()),
                faculty_id: raw.faculty_id.and_then(|s| s.trim().parse().ok()),
            },
            post_filter: PostFilter {
                has_reviews: raw
                    .has_reviews
                    .map(|s| {
                        let s = s.trim();
                        s.eq_ignore_ascii_case("true") || s == "1"
                    })
                    .unwrap_or(false),
                min_rating: raw
                    .min_rating
                    .and_then(|s| s.trim().parse().ok())
                    .filter(|&min: &i32| min > 0),
            },
            sort_by: SortPolicy::parse_or_default(raw.sort_by),
            page: raw
                .page
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(1)
                .max(1),
        }
    }
}

/// Unvalidated request values, borrowed from the transport layer
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCourseQuery<'a> {
    pub query: Option<&'a str>,
    pub category: Option<&'a str>,
    pub grading_type: Option<&'a str>,
    pub faculty_id: Option<&'a str>,
    pub min_rating: Option<&'a str>,
    pub has_reviews: Option<&'a str>,
    pub sort_by: Option<&'a str>,
    pub page: Option<&'a str>,
}
