//! Create `interface_info` table.
//! Stores published API metadata: address, method, request/response samples and status.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InterfaceInfo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InterfaceInfo::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_len(InterfaceInfo::Name, 256).not_null())
                    .col(ColumnDef::new(InterfaceInfo::Description).text().null())
                    .col(string_len(InterfaceInfo::Url, 512).not_null())
                    .col(string_len(InterfaceInfo::Method, 16).not_null())
                    .col(ColumnDef::new(InterfaceInfo::RequestParams).text().null())
                    .col(ColumnDef::new(InterfaceInfo::RequestExample).text().null())
                    .col(ColumnDef::new(InterfaceInfo::RequestHeader).text().null())
                    .col(ColumnDef::new(InterfaceInfo::ResponseHeader).text().null())
                    .col(ColumnDef::new(InterfaceInfo::ReturnFormat).string_len(64).null())
                    .col(ColumnDef::new(InterfaceInfo::AvatarUrl).string_len(1024).null())
                    .col(big_integer(InterfaceInfo::ReduceScore).not_null().default(0))
                    .col(big_integer(InterfaceInfo::TotalInvokes).not_null().default(0))
                    // 0 - offline, 1 - online
                    .col(integer(InterfaceInfo::Status).not_null().default(0))
                    .col(big_integer(InterfaceInfo::UserId).not_null())
                    .col(timestamp_with_time_zone(InterfaceInfo::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(InterfaceInfo::UpdatedAt).not_null())
                    .col(
                        ColumnDef::new(InterfaceInfo::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(InterfaceInfo::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum InterfaceInfo {
    Table,
    Id,
    Name,
    Description,
    Url,
    Method,
    RequestParams,
    RequestExample,
    RequestHeader,
    ResponseHeader,
    ReturnFormat,
    AvatarUrl,
    ReduceScore,
    TotalInvokes,
    Status,
    UserId,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
