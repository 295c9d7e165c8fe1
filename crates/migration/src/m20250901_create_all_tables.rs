use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::FirstName).string().not_null())
                    .col(ColumnDef::new(Users::LastName).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(ColumnDef::new(Users::Status).text())
                    .col(
                        ColumnDef::new(Users::Role)
                            .text()
                            .not_null()
                            .default("student"),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create courses table
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Courses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Courses::Prefix).string().not_null())
                    .col(ColumnDef::new(Courses::Number).string().not_null())
                    .col(ColumnDef::new(Courses::Name).string().not_null())
                    .col(ColumnDef::new(Courses::Program).string())
                    .col(ColumnDef::new(Courses::Description).text())
                    .col(
                        ColumnDef::new(Courses::Prerequisites)
                            .array(ColumnType::Text)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Courses::CreditHoursMin).double().not_null())
                    .col(ColumnDef::new(Courses::CreditHoursMax).double())
                    .col(ColumnDef::new(Courses::LectureHoursMin).double())
                    .col(
                        ColumnDef::new(Courses::DateOfLastRevision)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Courses::LearningObjectives)
                            .array(ColumnType::Text)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Courses::Topics)
                            .array(ColumnType::Text)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Courses::ClickCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // Create shopping_carts table, one per user
        manager
            .create_table(
                Table::create()
                    .table(ShoppingCarts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ShoppingCarts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ShoppingCarts::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ShoppingCarts::Items).json_binary().not_null())
                    .col(
                        ColumnDef::new(ShoppingCarts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ShoppingCarts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-shopping_carts-user_id")
                            .from(ShoppingCarts::Table, ShoppingCarts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create schedules table. Uniqueness per (user, term, year) is checked
        // by the application, not by a constraint.
        manager
            .create_table(
                Table::create()
                    .table(Schedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schedules::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Schedules::UserId).uuid().not_null())
                    .col(ColumnDef::new(Schedules::Term).text().not_null())
                    .col(ColumnDef::new(Schedules::Year).integer().not_null())
                    .col(ColumnDef::new(Schedules::Courses).json_binary().not_null())
                    .col(
                        ColumnDef::new(Schedules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Schedules::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-schedules-user_id")
                            .from(Schedules::Table, Schedules::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Schedules::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ShoppingCarts::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    FirstName,
    LastName,
    Email,
    Password,
    Status,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Courses {
    Table,
    Id,
    Prefix,
    Number,
    Name,
    Program,
    Description,
    Prerequisites,
    CreditHoursMin,
    CreditHoursMax,
    LectureHoursMin,
    DateOfLastRevision,
    LearningObjectives,
    Topics,
    ClickCount,
}

#[derive(Iden)]
enum ShoppingCarts {
    Table,
    Id,
    UserId,
    Items,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Schedules {
    Table,
    Id,
    UserId,
    Term,
    Year,
    Courses,
    CreatedAt,
    UpdatedAt,
}
