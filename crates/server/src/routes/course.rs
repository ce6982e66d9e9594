use crate::{
    dtos::course::{
        CourseDetailResponse, CourseFiltersResponse, CourseQueryParams, PaginatedCoursesResponse,
    },
    error::AppError,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use database::services::{course::CourseService, query_course::QueryCourseService};

/// Search, filter, sort and paginate courses
///
/// A storage failure is answered with an empty first page.
#[utoipa::path(
    get,
    path = "/courses",
    params(CourseQueryParams),
    responses(
        (status = 200, description = "One page of matching courses", body = PaginatedCoursesResponse)
    ),
    tag = "Courses"
)]
pub async fn get_courses(
    State(state): State<AppState>,
    Query(params): Query<CourseQueryParams>,
) -> Json<PaginatedCoursesResponse> {
    let query = params.to_query();
    let page = CourseService::discover(&state.db, &query).await;

    Json(page.into())
}

/// Get a specific course by its code
#[utoipa::path(
    get,
    path = "/courses/{code}",
    params(
        ("code" = String, Path, description = "Course code, e.g. EN811301")
    ),
    responses(
        (status = 200, description = "Course found", body = CourseDetailResponse),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Courses"
)]
pub async fn get_course_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<CourseDetailResponse>, AppError> {
    match QueryCourseService::get_course_by_code(&state.db, &code).await? {
        Some(detail) => Ok(Json(detail.into())),
        None => Err(AppError::CourseNotFound(code)),
    }
}

/// Get the faculties, categories, grading types and sort orders to filter by
#[utoipa::path(
    get,
    path = "/courses/filters",
    responses(
        (status = 200, description = "Filter options retrieved successfully", body = CourseFiltersResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Courses"
)]
pub async fn get_course_filters(
    State(state): State<AppState>,
) -> Result<Json<CourseFiltersResponse>, AppError> {
    let faculties = QueryCourseService::get_faculties(&state.db).await?;

    Ok(Json(CourseFiltersResponse::new(faculties)))
}
