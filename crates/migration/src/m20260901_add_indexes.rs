use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Indexes on courses for the listing filters
        manager
            .create_index(
                Index::create()
                    .name("idx_courses_faculty_id")
                    .table(Courses::Table)
                    .col(Courses::FacultyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_courses_category_grading_type")
                    .table(Courses::Table)
                    .col(Courses::Category)
                    .col(Courses::GradingType)
                    .to_owned(),
            )
            .await?;

        // Index on reviews.course_id for the batched rating lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_course_id")
                    .table(Reviews::Table)
                    .col(Reviews::CourseId)
                    .to_owned(),
            )
            .await?;

        // Index on course_tags.course_id for the batched tag lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_course_tags_course_id")
                    .table(CourseTags::Table)
                    .col(CourseTags::CourseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop indexes in reverse order
        manager
            .drop_index(Index::drop().name("idx_course_tags_course_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_reviews_course_id").to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_courses_category_grading_type")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("idx_courses_faculty_id").to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Courses {
    Table,
    FacultyId,
    Category,
    GradingType,
}

#[derive(Iden)]
enum Reviews {
    Table,
    CourseId,
}

#[derive(Iden)]
enum CourseTags {
    Table,
    CourseId,
}
