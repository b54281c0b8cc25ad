use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum ChatParticipants {
    Table,
    Id,
    ChatSessionId,
    UserId,
    Role,
    JoinedAt,
    LeftAt,
    CreatedAt,
    UpdatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250301_000004_create_chat_participants_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChatParticipants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChatParticipants::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ChatParticipants::ChatSessionId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ChatParticipants::UserId).string().not_null())
                    .col(ColumnDef::new(ChatParticipants::Role).string())
                    .col(
                        ColumnDef::new(ChatParticipants::JoinedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ChatParticipants::LeftAt).big_integer())
                    .col(
                        ColumnDef::new(ChatParticipants::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChatParticipants::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_chat_participants_session")
                    .table(ChatParticipants::Table)
                    .col(ChatParticipants::ChatSessionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_chat_participants_user")
                    .table(ChatParticipants::Table)
                    .col(ChatParticipants::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChatParticipants::Table).to_owned())
            .await
    }
}
