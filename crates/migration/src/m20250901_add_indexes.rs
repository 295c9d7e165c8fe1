use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Trending courses are read in click order
        manager
            .create_index(
                Index::create()
                    .name("idx_courses_click_count")
                    .table(Courses::Table)
                    .col(Courses::ClickCount)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_courses_prefix_number")
                    .table(Courses::Table)
                    .col(Courses::Prefix)
                    .col(Courses::Number)
                    .to_owned(),
            )
            .await?;

        // Schedule lookups by owner and term
        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_user_term_year")
                    .table(Schedules::Table)
                    .col(Schedules::UserId)
                    .col(Schedules::Term)
                    .col(Schedules::Year)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_schedules_user_term_year")
                    .table(Schedules::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_courses_prefix_number")
                    .table(Courses::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_courses_click_count")
                    .table(Courses::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Courses {
    Table,
    Prefix,
    Number,
    ClickCount,
}

#[derive(Iden)]
enum Schedules {
    Table,
    UserId,
    Term,
    Year,
}
