// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DbBackend};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Actors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Actors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Actors::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Actors::Description).text().not_null())
                    .col(ColumnDef::new(Actors::FirstName).string().not_null())
                    .col(ColumnDef::new(Actors::LastName).string().not_null())
                    .col(ColumnDef::new(Actors::Address).text().not_null())
                    .col(ColumnDef::new(Actors::Height).string().null())
                    .col(ColumnDef::new(Actors::Weight).string().null())
                    .col(ColumnDef::new(Actors::Gender).string().null())
                    .col(ColumnDef::new(Actors::Age).integer().null())
                    .col(ColumnDef::new(Actors::RawAiResponse).json().not_null())
                    .col(
                        ColumnDef::new(Actors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // email and description must stay unique across all submissions
        manager
            .create_index(
                Index::create()
                    .name("idx_actors_email_unique")
                    .table(Actors::Table)
                    .col(Actors::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Postgres btree entries are capped near 2.7KB, so long descriptions are indexed by digest
        if manager.get_database_backend() == DbBackend::Postgres {
            manager
                .get_connection()
                .execute_unprepared(
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_actors_description_unique \
                     ON actors (md5(description))",
                )
                .await?;
        } else {
            manager
                .create_index(
                    Index::create()
                        .name("idx_actors_description_unique")
                        .table(Actors::Table)
                        .col(Actors::Description)
                        .unique()
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_index(
                Index::create()
                    .name("idx_actors_created_at")
                    .table(Actors::Table)
                    .col(Actors::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Actors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Actors {
    Table,
    Id,
    Email,
    Description,
    FirstName,
    LastName,
    Address,
    Height,
    Weight,
    Gender,
    Age,
    RawAiResponse,
    CreatedAt,
}
