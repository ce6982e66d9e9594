use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create faculties table
        manager
            .create_table(
                Table::create()
                    .table(Faculties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Faculties::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Faculties::NameTh).string().not_null())
                    .col(ColumnDef::new(Faculties::NameEn).string().not_null())
                    .col(ColumnDef::new(Faculties::Color).string())
                    .to_owned(),
            )
            .await?;

        // Create courses table
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Courses::NameTh).string().not_null())
                    .col(ColumnDef::new(Courses::NameEn).string())
                    .col(ColumnDef::new(Courses::FacultyId).integer())
                    .col(ColumnDef::new(Courses::Category).text().not_null())
                    .col(ColumnDef::new(Courses::GradingType).text().not_null())
                    .col(
                        ColumnDef::new(Courses::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Courses::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-courses-faculty_id")
                            .from(Courses::Table, Courses::FacultyId)
                            .to(Faculties::Table, Faculties::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create course_tags table
        manager
            .create_table(
                Table::create()
                    .table(CourseTags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseTags::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseTags::CourseId).integer().not_null())
                    .col(ColumnDef::new(CourseTags::Name).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-course_tags-course_id")
                            .from(CourseTags::Table, CourseTags::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create reviews table
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reviews::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reviews::CourseId).integer().not_null())
                    .col(
                        ColumnDef::new(Reviews::Rating)
                            .integer()
                            .check(Expr::col(Reviews::Rating).between(1, 5)),
                    )
                    .col(ColumnDef::new(Reviews::Content).text())
                    .col(
                        ColumnDef::new(Reviews::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reviews-course_id")
                            .from(Reviews::Table, Reviews::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(Reviews::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CourseTags::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Faculties::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Faculties {
    Table,
    Id,
    NameTh,
    NameEn,
    Color,
}

#[derive(Iden)]
enum Courses {
    Table,
    Id,
    Code,
    NameTh,
    NameEn,
    FacultyId,
    Category,
    GradingType,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CourseTags {
    Table,
    Id,
    CourseId,
    Name,
}

#[derive(Iden)]
enum Reviews {
    Table,
    Id,
    CourseId,
    Rating,
    Content,
    CreatedAt,
}
