use crate::services::query_course::CourseReader;
use log::{debug, error};
use models::{
    course_query::CourseQuery,
    course_record::CourseSummary,
    pagination::{PAGE_SIZE, Page},
};
use sea_orm::DbErr;

pub struct CourseService;

impl CourseService {
    /// Runs a discovery request end to end: read, aggregate, post-filter,
    /// sort and paginate.
    ///
    /// A failed read is logged and answered with an empty first page, so
    /// callers cannot tell an outage from an empty catalog. Use
    /// [`CourseService::try_discover`] when that distinction matters.
    pub async fn discover<R: CourseReader>(reader: &R, query: &CourseQuery) -> Page<CourseSummary> {
        match Self::try_discover(reader, query).await {
            Ok(page) => page,
            Err(e) => {
                error!("Failed to read courses, returning an empty page: {e}");
                Page::empty()
            }
        }
    }

    pub async fn try_discover<R: CourseReader>(
        reader: &R,
        query: &CourseQuery,
    ) -> Result<Page<CourseSummary>, DbErr> {
        let records = reader.find_courses(&query.filter).await?;
        let matched = records.len();

        let courses = records.into_iter().map(CourseSummary::from).collect();

        // Aggregates must exist before these predicates can run
        let mut courses = query.post_filter.apply(courses);
        query.sort_by.sort(&mut courses);

        debug!(
            "Discovery matched {matched} courses, {} after post-filter, sorted by {}",
            courses.len(),
            query.sort_by
        );

        Ok(Page::paginate(courses, query.page, PAGE_SIZE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{
        course_category::{Category, GradingType},
        course_query::{CourseFilter, PostFilter},
        course_record::CourseRecord,
        sort_policy::SortPolicy,
    };

    /// Evaluates the storage predicates in memory over a fixed snapshot
    struct InMemoryReader {
        courses: Vec<CourseRecord>,
    }

    impl CourseReader for InMemoryReader {
        async fn find_courses(&self, filter: &CourseFilter) -> Result<Vec<CourseRecord>, DbErr> {
            let term = filter.search_term().map(str::to_lowercase);

            let mut matched: Vec<CourseRecord> = self
                .courses
                .iter()
                .filter(|c| {
                    term.as_ref().is_none_or(|t| {
                        c.name_th.to_lowercase().contains(t.as_str())
                            || c.code.to_lowercase().contains(t.as_str())
                            || c
                                .name_en
                                .as_ref()
                                .is_some_and(|n| n.to_lowercase().contains(t.as_str()))
                    })
                })
                .filter(|c| filter.category.is_none_or(|v| c.category == v))
                .filter(|c| filter.grading_type.is_none_or(|v| c.grading_type == v))
                .filter(|c| filter.faculty_id.is_none_or(|v| c.faculty_id == Some(v)))
                .cloned()
                .collect();
            matched.sort_by(|a, b| a.code.cmp(&b.code));

            Ok(matched)
        }
    }

    struct FailingReader;

    impl CourseReader for FailingReader {
        async fn find_courses(&self, _filter: &CourseFilter) -> Result<Vec<CourseRecord>, DbErr> {
            Err(DbErr::Custom("connection refused".to_string()))
        }
    }

    fn record(code: &str, ratings: &[Option<i32>]) -> CourseRecord {
        CourseRecord {
            id: code.bytes().map(i32::from).sum(),
            code: code.to_string(),
            name_th: format!("วิชา {code}"),
            name_en: Some(format!("Course {code}")),
            category: Category::General,
            grading_type: GradingType::Norm,
            faculty_id: Some(1),
            faculty_name_th: Some("วิศวกรรมศาสตร์".to_string()),
            faculty_name_en: Some("Engineering".to_string()),
            faculty_color: Some("#7A1F2B".to_string()),
            tags: vec!["core".to_string()],
            ratings: ratings.to_vec(),
        }
    }

    fn codes(page: &Page<CourseSummary>) -> Vec<&str> {
        page.items.iter().map(|c| c.code.as_str()).collect()
    }

    fn query(sort_by: SortPolicy) -> CourseQuery {
        CourseQuery {
            sort_by,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let reader = InMemoryReader { courses: vec![] };
        let page = CourseService::discover(&reader, &CourseQuery::default()).await;

        assert_eq!(page, Page::empty());
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn test_read_failure_returns_empty_page() {
        let page = CourseService::discover(&FailingReader, &CourseQuery::default()).await;
        assert_eq!(page, Page::empty());

        let result = CourseService::try_discover(&FailingReader, &CourseQuery::default()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_aggregates_are_attached() {
        let reader = InMemoryReader {
            courses: vec![record("EN811301", &[Some(5), Some(4), None, Some(3)])],
        };
        let page = CourseService::discover(&reader, &CourseQuery::default()).await;

        let course = &page.items[0];
        assert_eq!(course.review_count, 4);
        assert_eq!(course.avg_rating, 3.0);
        assert_eq!(course.faculty_name_en.as_deref(), Some("Engineering"));
        assert_eq!(course.tags, vec!["core"]);
    }

    #[tokio::test]
    async fn test_default_sort_breaks_ties_by_code() {
        let reader = InMemoryReader {
            courses: vec![
                record("EN811302", &[Some(4), Some(2)]),
                record("EN811301", &[Some(1), Some(5)]),
                record("EN811303", &[Some(3)]),
            ],
        };
        let page = CourseService::discover(&reader, &CourseQuery::default()).await;
        assert_eq!(codes(&page), vec!["EN811301", "EN811302", "EN811303"]);
    }

    #[tokio::test]
    async fn test_post_filters_apply_after_aggregation() {
        let reader = InMemoryReader {
            courses: vec![
                record("A", &[]),
                // Averages 2.5 because the unrated review still counts
                record("B", &[Some(5), None]),
                record("C", &[Some(3), Some(3)]),
                record("D", &[Some(5)]),
            ],
        };

        let query = CourseQuery {
            post_filter: PostFilter {
                has_reviews: true,
                min_rating: Some(3),
            },
            ..query(SortPolicy::CodeAsc)
        };
        let page = CourseService::discover(&reader, &query).await;

        assert_eq!(codes(&page), vec!["C", "D"]);
        assert_eq!(page.total_count, 2);
    }

    #[tokio::test]
    async fn test_storage_filters_are_conjoined() {
        let mut major = record("EN100", &[]);
        major.category = Category::Major;
        let mut criterion = record("EN200", &[]);
        criterion.grading_type = GradingType::Criterion;
        let mut other_faculty = record("EN300", &[]);
        other_faculty.faculty_id = Some(2);
        let mut all = record("EN400", &[]);
        all.category = Category::Major;
        all.grading_type = GradingType::Criterion;

        let reader = InMemoryReader {
            courses: vec![major, criterion, other_faculty, all],
        };
        let query = CourseQuery {
            filter: CourseFilter {
                query: Some("en".to_string()),
                category: Some(Category::Major),
                grading_type: Some(GradingType::Criterion),
                faculty_id: Some(1),
            },
            ..Default::default()
        };

        let page = CourseService::discover(&reader, &query).await;
        assert_eq!(codes(&page), vec!["EN400"]);
    }

    #[tokio::test]
    async fn test_rating_asc_puts_unreviewed_last() {
        let reader = InMemoryReader {
            courses: vec![
                record("A", &[]),
                record("B", &[Some(1)]),
                record("C", &[Some(5), Some(4)]),
            ],
        };
        let page = CourseService::discover(&reader, &query(SortPolicy::RatingAsc)).await;
        assert_eq!(codes(&page), vec!["B", "C", "A"]);
    }

    #[tokio::test]
    async fn test_page_past_end_is_clamped() {
        let courses = (0..10).map(|i| record(&format!("EN8113{i:02}"), &[])).collect();
        let reader = InMemoryReader { courses };

        let first = CourseService::discover(&reader, &query(SortPolicy::CodeAsc)).await;
        assert_eq!(first.items.len(), 9);
        assert_eq!(first.total_pages, 2);

        let past_end = CourseQuery {
            page: 5,
            ..query(SortPolicy::CodeAsc)
        };
        let page = CourseService::discover(&reader, &past_end).await;
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 10);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.current_page, 2);
    }

    #[tokio::test]
    async fn test_repeated_calls_are_identical() {
        let reader = InMemoryReader {
            courses: vec![
                record("EN3", &[Some(4)]),
                record("EN1", &[Some(4)]),
                record("EN2", &[None]),
            ],
        };

        for policy in SortPolicy::all() {
            let first = CourseService::discover(&reader, &query(policy)).await;
            let second = CourseService::discover(&reader, &query(policy)).await;
            assert_eq!(first, second);
        }
    }
}
