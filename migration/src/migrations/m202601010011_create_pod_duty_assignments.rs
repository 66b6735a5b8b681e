use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601010011_create_pod_duty_assignments"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("pod_duty_assignments"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("tenant_id")).string().not_null())
                    .col(ColumnDef::new(Alias::new("assignment_date")).date().not_null())
                    .col(ColumnDef::new(Alias::new("grade")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("pod")).string().not_null())
                    .col(
                        ColumnDef::new(Alias::new("slot_type"))
                            .enumeration(
                                Alias::new("slot_type"),
                                vec![Alias::new("period"), Alias::new("break")],
                            )
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("period")).integer().null())
                    .col(ColumnDef::new(Alias::new("teacher_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("break_location")).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("pod_duty_assignments"), Alias::new("teacher_id"))
                            .to(Alias::new("teachers"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pod_duty_assignments_unique")
                    .table(Alias::new("pod_duty_assignments"))
                    .col(Alias::new("assignment_date"))
                    .col(Alias::new("teacher_id"))
                    .col(Alias::new("slot_type"))
                    .col(Alias::new("period"))
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("pod_duty_assignments")).to_owned())
            .await
    }
}
