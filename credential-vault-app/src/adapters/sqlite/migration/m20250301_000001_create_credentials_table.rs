use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Credential::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Credential::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Credential::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Credential::Platform).string().not_null())
                    .col(ColumnDef::new(Credential::AccountName).string().null())
                    .col(ColumnDef::new(Credential::Url).string().null())
                    .col(ColumnDef::new(Credential::Username).string().not_null())
                    .col(ColumnDef::new(Credential::Password).string().not_null())
                    .col(
                        ColumnDef::new(Credential::AccountIdentity)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Credential::AccountType)
                            .string()
                            .not_null()
                            .default("#1-TopPriority"),
                    )
                    .col(
                        ColumnDef::new(Credential::Status)
                            .string()
                            .not_null()
                            .default("Active"),
                    )
                    .col(ColumnDef::new(Credential::SpecialPin).string().null())
                    .col(ColumnDef::new(Credential::RecoveryNumber).string().null())
                    .col(ColumnDef::new(Credential::RecoveryEmail).string().null())
                    .col(ColumnDef::new(Credential::LastChanged).string().not_null())
                    .to_owned(),
            )
            .await?;

        // 按用户查询
        manager
            .create_index(
                Index::create()
                    .name("idx_credentials_user_id")
                    .table(Credential::Table)
                    .col(Credential::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Credential::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Credential {
    #[sea_orm(iden = "credentials")]
    Table,
    Id,
    UserId,
    Platform,
    AccountName,
    Url,
    Username,
    Password,
    AccountIdentity,
    AccountType,
    Status,
    SpecialPin,
    RecoveryNumber,
    RecoveryEmail,
    LastChanged,
}
