use crate::entities::{course, course_tag, faculty, review};
use log::debug;
use models::{course_query::CourseFilter, course_record::CourseRecord};
use sea_orm::{
    ColumnTrait, Condition, DatabaseBackend, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait, Select, prelude::Expr,
};
use std::collections::HashMap;

/// Course ids bound per review/tag query, well below Postgres' 65535 bind parameters
const ID_BATCH_SIZE: usize = 10_000;

/// Read access to courses and their nested review ratings
pub trait CourseReader {
    /// Returns every course matching all predicates of `filter`, ordered by code
    fn find_courses(
        &self,
        filter: &CourseFilter,
    ) -> impl Future<Output = Result<Vec<CourseRecord>, DbErr>> + Send;
}

impl CourseReader for DatabaseConnection {
    async fn find_courses(&self, filter: &CourseFilter) -> Result<Vec<CourseRecord>, DbErr> {
        QueryCourseService::find_courses(self, filter).await
    }
}

/// A single course with everything its detail view shows
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDetail {
    pub course: course::Model,
    pub faculty: Option<faculty::Model>,
    pub tags: Vec<String>,
    /// Newest first
    pub reviews: Vec<review::Model>,
}

pub struct QueryCourseService;

impl QueryCourseService {
    /// Query courses matching the storage-level filters, with faculty, tags and ratings
    pub async fn find_courses(
        db: &DatabaseConnection,
        filter: &CourseFilter,
    ) -> Result<Vec<CourseRecord>, DbErr> {
        let query = Self::select_courses(filter)
            .order_by_asc(course::Column::Code)
            .find_also_related(faculty::Entity);

        debug!("Generated SQL: {}", query.build(DatabaseBackend::Postgres));

        let rows = query.all(db).await?;
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let course_ids: Vec<i32> = rows.iter().map(|(course, _)| course.id).collect();

        // Batch fetch ratings and tags for all matched courses
        let (ratings, tags) = futures::try_join!(
            futures::future::try_join_all(course_ids.chunks(ID_BATCH_SIZE).map(|batch| {
                Self::select_ratings(batch)
                    .into_tuple::<(i32, Option<i32>)>()
                    .all(db)
            })),
            futures::future::try_join_all(course_ids.chunks(ID_BATCH_SIZE).map(|batch| {
                Self::select_tags(batch)
                    .into_tuple::<(i32, String)>()
                    .all(db)
            })),
        )?;

        // Build lookup maps
        let mut ratings_by_course: HashMap<i32, Vec<Option<i32>>> = HashMap::new();
        for (course_id, rating) in ratings.into_iter().flatten() {
            ratings_by_course.entry(course_id).or_default().push(rating);
        }

        let mut tags_by_course: HashMap<i32, Vec<String>> = HashMap::new();
        for (course_id, name) in tags.into_iter().flatten() {
            tags_by_course.entry(course_id).or_default().push(name);
        }

        let records = rows
            .into_iter()
            .map(|(course, faculty)| {
                let (faculty_name_th, faculty_name_en, faculty_color) = match faculty {
                    Some(faculty) => (Some(faculty.name_th), Some(faculty.name_en), faculty.color),
                    None => (None, None, None),
                };

                CourseRecord {
                    ratings: ratings_by_course.remove(&course.id).unwrap_or_default(),
                    tags: tags_by_course.remove(&course.id).unwrap_or_default(),
                    id: course.id,
                    code: course.code,
                    name_th: course.name_th,
                    name_en: course.name_en,
                    category: course.category,
                    grading_type: course.grading_type,
                    faculty_id: course.faculty_id,
                    faculty_name_th,
                    faculty_name_en,
                    faculty_color,
                }
            })
            .collect();

        Ok(records)
    }

    /// Courses matching `filter`, with no WHERE clause at all when nothing is filtered
    fn select_courses(filter: &CourseFilter) -> Select<course::Entity> {
        let condition = Self::build_filter_condition(filter);
        let select = course::Entity::find();

        if condition.is_empty() {
            select
        } else {
            select.filter(condition)
        }
    }

    /// `(course_id, rating)` for every review of the given courses
    fn select_ratings(course_ids: &[i32]) -> Select<review::Entity> {
        review::Entity::find()
            .select_only()
            .column(review::Column::CourseId)
            .column(review::Column::Rating)
            .filter(review::Column::CourseId.is_in(course_ids.iter().copied()))
            .order_by_asc(review::Column::Id)
    }

    fn select_tags(course_ids: &[i32]) -> Select<course_tag::Entity> {
        course_tag::Entity::find()
            .select_only()
            .column(course_tag::Column::CourseId)
            .column(course_tag::Column::Name)
            .filter(course_tag::Column::CourseId.is_in(course_ids.iter().copied()))
            .order_by_asc(course_tag::Column::Id)
    }

    /// AND of every supplied filter; the free-text query is an OR over names and code
    pub fn build_filter_condition(filter: &CourseFilter) -> Condition {
        let mut condition = Condition::all();

        if let Some(term) = filter.search_term() {
            let pattern = format!("%{}%", escape_like(term));
            condition = condition.add(
                Condition::any()
                    .add(Expr::cust_with_values(
                        "courses.name_th ILIKE $1",
                        [pattern.clone()],
                    ))
                    .add(Expr::cust_with_values(
                        "courses.name_en ILIKE $1",
                        [pattern.clone()],
                    ))
                    .add(Expr::cust_with_values("courses.code ILIKE $1", [pattern])),
            );
        }

        if let Some(category) = filter.category {
            condition = condition.add(course::Column::Category.eq(category));
        }

        if let Some(grading_type) = filter.grading_type {
            condition = condition.add(course::Column::GradingType.eq(grading_type));
        }

        if let Some(faculty_id) = filter.faculty_id {
            condition = condition.add(course::Column::FacultyId.eq(faculty_id));
        }

        condition
    }

    /// Get a single course by its exact code, with faculty, tags and reviews
    pub async fn get_course_by_code(
        db: &DatabaseConnection,
        code: &str,
    ) -> Result<Option<CourseDetail>, DbErr> {
        let Some((course, faculty)) = course::Entity::find()
            .filter(course::Column::Code.eq(code))
            .find_also_related(faculty::Entity)
            .one(db)
            .await?
        else {
            return Ok(None);
        };

        let (tags, reviews) = futures::try_join!(
            course_tag::Entity::find()
                .filter(course_tag::Column::CourseId.eq(course.id))
                .order_by_asc(course_tag::Column::Id)
                .all(db),
            review::Entity::find()
                .filter(review::Column::CourseId.eq(course.id))
                .order_by_desc(review::Column::CreatedAt)
                .order_by_desc(review::Column::Id)
                .all(db),
        )?;

        Ok(Some(CourseDetail {
            course,
            faculty,
            tags: tags.into_iter().map(|tag| tag.name).collect(),
            reviews,
        }))
    }

    /// All faculties, for the search form
    pub async fn get_faculties(db: &DatabaseConnection) -> Result<Vec<faculty::Model>, DbErr> {
        faculty::Entity::find()
            .order_by_asc(faculty::Column::Id)
            .all(db)
            .await
    }
}

/// Escapes LIKE wildcards so user input only ever matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::course_category::{Category, GradingType};

    fn where_clause(filter: &CourseFilter) -> String {
        QueryCourseService::select_courses(filter)
            .build(DatabaseBackend::Postgres)
            .to_string()
    }

    fn bound_values(statement: sea_orm::Statement) -> usize {
        statement.values.map(|values| values.0.len()).unwrap_or(0)
    }

    #[test]
    fn test_empty_filter_has_no_predicates() {
        let sql = where_clause(&CourseFilter::default());
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with(r#"FROM "courses""#));
    }

    #[test]
    fn test_blank_query_has_no_predicates() {
        let sql = where_clause(&CourseFilter {
            query: Some("  ".to_string()),
            ..Default::default()
        });
        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn test_query_matches_names_or_code() {
        let sql = where_clause(&CourseFilter {
            query: Some("calc".to_string()),
            ..Default::default()
        });

        assert!(sql.contains("courses.name_th ILIKE '%calc%'"));
        assert!(sql.contains("courses.name_en ILIKE '%calc%'"));
        assert!(sql.contains("courses.code ILIKE '%calc%'"));
        assert!(sql.contains(" OR "));
    }

    #[test]
    fn test_every_filter_is_conjoined() {
        let sql = where_clause(&CourseFilter {
            query: Some("law".to_string()),
            category: Some(Category::Major),
            grading_type: Some(GradingType::Norm),
            faculty_id: Some(3),
        });

        assert!(sql.contains(r#""courses"."category" = 'MAJOR'"#));
        assert!(sql.contains(r#""courses"."grading_type" = 'NORM'"#));
        assert!(sql.contains(r#""courses"."faculty_id" = 3"#));
        assert!(sql.contains("courses.code ILIKE '%law%'"));
        assert_eq!(sql.matches(" AND ").count(), 3);
    }

    #[test]
    fn test_single_filter() {
        let sql = where_clause(&CourseFilter {
            category: Some(Category::FreeElective),
            ..Default::default()
        });

        assert!(sql.contains(r#""courses"."category" = 'FREE_ELECTIVE'"#));
        assert!(!sql.contains("grading_type\" ="));
        assert!(!sql.contains("ILIKE"));
    }

    #[test]
    fn test_large_match_sets_are_fetched_in_batches() {
        let ids: Vec<i32> = (1..=70_000).collect();
        let batches: Vec<&[i32]> = ids.chunks(ID_BATCH_SIZE).collect();
        assert_eq!(batches.len(), 7);

        let mut ratings_bound = 0;
        let mut tags_bound = 0;
        for batch in batches {
            let ratings = bound_values(
                QueryCourseService::select_ratings(batch).build(DatabaseBackend::Postgres),
            );
            let tags = bound_values(
                QueryCourseService::select_tags(batch).build(DatabaseBackend::Postgres),
            );

            assert_eq!(ratings, batch.len());
            assert_eq!(tags, batch.len());
            assert!(ratings <= u16::MAX as usize);
            ratings_bound += ratings;
            tags_bound += tags;
        }

        assert_eq!(ratings_bound, ids.len());
        assert_eq!(tags_bound, ids.len());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\"), "c:\\\\");
        assert_eq!(escape_like("วิศวกรรม"), "วิศวกรรม");
    }
}
