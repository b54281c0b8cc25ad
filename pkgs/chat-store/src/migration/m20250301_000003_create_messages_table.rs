use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Messages {
    Table,
    Id,
    Text,
    SenderId,
    ChatSessionId,
    Status,
    Timestamp,
    ReplyToMessageId,
    MediaUrl,
    MediaType,
    CreatedAt,
    UpdatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250301_000003_create_messages_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No foreign keys: sender and session ids are references by convention only
        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Messages::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Messages::Text).string().not_null())
                    .col(ColumnDef::new(Messages::SenderId).string().not_null())
                    .col(ColumnDef::new(Messages::ChatSessionId).string().not_null())
                    .col(
                        ColumnDef::new(Messages::Status)
                            .string()
                            .not_null()
                            .default("sent"),
                    )
                    .col(ColumnDef::new(Messages::Timestamp).big_integer().not_null())
                    .col(ColumnDef::new(Messages::ReplyToMessageId).string())
                    .col(ColumnDef::new(Messages::MediaUrl).string())
                    .col(ColumnDef::new(Messages::MediaType).string())
                    .col(ColumnDef::new(Messages::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Messages::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_messages_chat_session_timestamp")
                    .table(Messages::Table)
                    .col(Messages::ChatSessionId)
                    .col(Messages::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_messages_sender")
                    .table(Messages::Table)
                    .col(Messages::SenderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_messages_chat_session_timestamp")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_messages_sender").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await
    }
}
