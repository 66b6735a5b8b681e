use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601010015_create_notifier_tokens"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("notifier_tokens"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("tenant_id")).string().not_null())
                    .col(ColumnDef::new(Alias::new("profile")).string().not_null())
                    .col(ColumnDef::new(Alias::new("account_id")).string().null())
                    .col(ColumnDef::new(Alias::new("refresh_token")).text().null())
                    .col(ColumnDef::new(Alias::new("access_token")).text().null())
                    .col(ColumnDef::new(Alias::new("access_token_expires_at")).timestamp().null())
                    .col(ColumnDef::new(Alias::new("updated_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .primary_key(
                        Index::create()
                            .col(Alias::new("tenant_id"))
                            .col(Alias::new("profile")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("notifier_tokens"), Alias::new("tenant_id"))
                            .to(Alias::new("tenants"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("notifier_tokens")).to_owned())
            .await
    }
}
