use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601010004_create_schedule_entries"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("schedule_entries"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("tenant_id")).string().not_null())
                    .col(ColumnDef::new(Alias::new("teacher_id")).integer().not_null())
                    .col(
                        ColumnDef::new(Alias::new("day_code"))
                            .enumeration(
                                Alias::new("day_code"),
                                vec![
                                    Alias::new("MO"),
                                    Alias::new("TU"),
                                    Alias::new("WE"),
                                    Alias::new("TH"),
                                    Alias::new("FR"),
                                ],
                            )
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("period")).string().not_null())
                    .col(ColumnDef::new(Alias::new("period_raw")).string().not_null())
                    .col(ColumnDef::new(Alias::new("details")).string().not_null())
                    .col(ColumnDef::new(Alias::new("grade_detected")).string().null())
                    .col(ColumnDef::new(Alias::new("subject")).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("schedule_entries"), Alias::new("teacher_id"))
                            .to(Alias::new("teachers"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedule_entries_teacher_day_period")
                    .table(Alias::new("schedule_entries"))
                    .col(Alias::new("teacher_id"))
                    .col(Alias::new("day_code"))
                    .col(Alias::new("period"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("schedule_entries")).to_owned())
            .await
    }
}
