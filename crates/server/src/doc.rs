use crate::routes::{course, health, root};
use utoipa::OpenApi;

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        root::root,
        health::health,
        course::get_courses,
        course::get_course_filters,
        course::get_course_by_code
    ),
    tags(
        (name = "Health", description = "Liveness endpoints"),
        (name = "Courses", description = "Course discovery endpoints"),
    ),
    info(
        title = "Course Review API",
        version = "1.0.0",
        description = "Course search and review statistics",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
