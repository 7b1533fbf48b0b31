//! 点击事件表迁移
//!
//! 创建 click_events 表，按短码加时间建索引，
//! 每次重定向追加一行（referrer 和 user_agent 原样保存）。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClickEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClickEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClickEvents::Slug)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClickEvents::ClickedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClickEvents::Referrer).text().null())
                    .col(ColumnDef::new(ClickEvents::UserAgent).text().null())
                    .to_owned(),
            )
            .await?;

        // 时间范围查询索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_click_events_clicked_at")
                    .table(ClickEvents::Table)
                    .col(ClickEvents::ClickedAt)
                    .to_owned(),
            )
            .await?;

        // 单链接时间序列复合索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_click_events_slug_time")
                    .table(ClickEvents::Table)
                    .col(ClickEvents::Slug)
                    .col(ClickEvents::ClickedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_click_events_slug_time").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_click_events_clicked_at").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ClickEvents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ClickEvents {
    #[sea_orm(iden = "click_events")]
    Table,
    Id,
    Slug,
    ClickedAt,
    Referrer,
    UserAgent,
}
