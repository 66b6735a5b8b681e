use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601010007_create_incoming_leave_records"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("incoming_leave_records"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("tenant_id")).string().not_null())
                    .col(ColumnDef::new(Alias::new("request_id")).string().not_null())
                    .col(ColumnDef::new(Alias::new("teacher_email")).string().not_null())
                    .col(ColumnDef::new(Alias::new("teacher_name")).string().null())
                    .col(ColumnDef::new(Alias::new("leave_start")).date().not_null())
                    .col(ColumnDef::new(Alias::new("leave_end")).date().not_null())
                    .col(ColumnDef::new(Alias::new("status")).string().not_null())
                    .col(ColumnDef::new(Alias::new("raw_payload")).json().not_null())
                    .col(
                        ColumnDef::new(Alias::new("forward_status"))
                            .enumeration(
                                Alias::new("forward_status"),
                                vec![Alias::new("sent"), Alias::new("failed")],
                            )
                            .null(),
                    )
                    .col(ColumnDef::new(Alias::new("forward_detail")).text().null())
                    .col(ColumnDef::new(Alias::new("forwarded_at")).timestamp().null())
                    .col(ColumnDef::new(Alias::new("created_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(Alias::new("updated_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("incoming_leave_records"), Alias::new("tenant_id"))
                            .to(Alias::new("tenants"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incoming_leave_records_request_id")
                    .table(Alias::new("incoming_leave_records"))
                    .col(Alias::new("request_id"))
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("incoming_leave_records")).to_owned())
            .await
    }
}
