use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // InterfaceInfo: lookups by owner
        manager
            .create_index(
                Index::create()
                    .name("idx_interface_info_user")
                    .table(InterfaceInfo::Table)
                    .col(InterfaceInfo::UserId)
                    .to_owned(),
            )
            .await?;

        // InterfaceInfo: status filter on paged listing
        manager
            .create_index(
                Index::create()
                    .name("idx_interface_info_status")
                    .table(InterfaceInfo::Table)
                    .col(InterfaceInfo::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_interface_info_name")
                    .table(InterfaceInfo::Table)
                    .col(InterfaceInfo::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_interface_info_name").table(InterfaceInfo::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_interface_info_status").table(InterfaceInfo::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_interface_info_user").table(InterfaceInfo::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum InterfaceInfo { Table, UserId, Status, Name }
