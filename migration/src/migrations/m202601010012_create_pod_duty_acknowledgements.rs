use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601010012_create_pod_duty_acknowledgements"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("pod_duty_acknowledgements"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("pod_duty_assignment_id")).integer().not_null().primary_key())
                    .col(
                        ColumnDef::new(Alias::new("status"))
                            .enumeration(
                                Alias::new("ack_status"),
                                vec![Alias::new("pending"), Alias::new("present"), Alias::new("unavailable")],
                            )
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Alias::new("note")).text().null())
                    .col(ColumnDef::new(Alias::new("updated_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("pod_duty_acknowledgements"), Alias::new("pod_duty_assignment_id"))
                            .to(Alias::new("pod_duty_assignments"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("pod_duty_acknowledgements")).to_owned())
            .await
    }
}
