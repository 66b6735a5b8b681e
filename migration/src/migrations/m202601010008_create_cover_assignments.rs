use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601010008_create_cover_assignments"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("cover_assignments"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("tenant_id")).string().not_null())
                    .col(ColumnDef::new(Alias::new("date")).date().not_null())
                    .col(ColumnDef::new(Alias::new("slot_key")).string().not_null())
                    .col(ColumnDef::new(Alias::new("request_id")).string().not_null())
                    .col(ColumnDef::new(Alias::new("day_label")).string().not_null())
                    .col(ColumnDef::new(Alias::new("absent_teacher")).string().not_null())
                    .col(ColumnDef::new(Alias::new("absent_email")).string().not_null())
                    .col(ColumnDef::new(Alias::new("cover_teacher")).string().null())
                    .col(ColumnDef::new(Alias::new("cover_email")).string().null())
                    .col(ColumnDef::new(Alias::new("cover_slug")).string().null())
                    .col(ColumnDef::new(Alias::new("cover_subject")).string().null())
                    .col(ColumnDef::new(Alias::new("cover_free_periods")).integer().null())
                    .col(ColumnDef::new(Alias::new("cover_scheduled")).integer().null())
                    .col(ColumnDef::new(Alias::new("cover_max_periods")).integer().null())
                    .col(ColumnDef::new(Alias::new("class_subject")).string().null())
                    .col(ColumnDef::new(Alias::new("class_grade")).string().null())
                    .col(ColumnDef::new(Alias::new("class_details")).string().null())
                    .col(ColumnDef::new(Alias::new("period_label")).string().null())
                    .col(ColumnDef::new(Alias::new("period_raw")).string().null())
                    .col(ColumnDef::new(Alias::new("class_time")).string().null())
                    .col(ColumnDef::new(Alias::new("status")).string().not_null().default("assigned"))
                    .col(ColumnDef::new(Alias::new("cover_assigned_at")).timestamp().null())
                    .col(ColumnDef::new(Alias::new("created_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(Alias::new("updated_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("cover_assignments"), Alias::new("tenant_id"))
                            .to(Alias::new("tenants"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cover_assignments_unique_slot")
                    .table(Alias::new("cover_assignments"))
                    .col(Alias::new("date"))
                    .col(Alias::new("request_id"))
                    .col(Alias::new("slot_key"))
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("cover_assignments")).to_owned())
            .await
    }
}
