use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601010005_create_leave_requests"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("leave_requests"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("tenant_id")).string().not_null())
                    .col(ColumnDef::new(Alias::new("teacher_id")).integer().not_null())
                    .col(
                        ColumnDef::new(Alias::new("leave_type"))
                            .enumeration(
                                Alias::new("leave_type"),
                                vec![
                                    Alias::new("sickleave"),
                                    Alias::new("conference_offsite"),
                                    Alias::new("training_offsite"),
                                    Alias::new("early_leave_request"),
                                ],
                            )
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("reason")).text().not_null())
                    .col(ColumnDef::new(Alias::new("leave_date")).date().not_null())
                    .col(ColumnDef::new(Alias::new("end_date")).date().not_null())
                    .col(ColumnDef::new(Alias::new("start_time")).time().null())
                    .col(ColumnDef::new(Alias::new("end_time")).time().null())
                    .col(
                        ColumnDef::new(Alias::new("status"))
                            .enumeration(
                                Alias::new("leave_status"),
                                vec![
                                    Alias::new("pending"),
                                    Alias::new("approved"),
                                    Alias::new("rejected"),
                                    Alias::new("invalid"),
                                ],
                            )
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Alias::new("admin_comment")).text().null())
                    .col(ColumnDef::new(Alias::new("reviewed_by")).string().null())
                    .col(ColumnDef::new(Alias::new("reviewed_at")).timestamp().null())
                    .col(ColumnDef::new(Alias::new("created_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(Alias::new("updated_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(Alias::new("attachment_required")).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Alias::new("attachment_status"))
                            .enumeration(
                                Alias::new("attachment_status"),
                                vec![
                                    Alias::new("not_required"),
                                    Alias::new("missing"),
                                    Alias::new("submitted"),
                                    Alias::new("approved"),
                                    Alias::new("declined"),
                                ],
                            )
                            .not_null()
                            .default("not_required"),
                    )
                    .col(ColumnDef::new(Alias::new("attachment_path")).string().null())
                    .col(ColumnDef::new(Alias::new("attachment_original_name")).string().null())
                    .col(ColumnDef::new(Alias::new("attachment_uploaded_at")).timestamp().null())
                    .col(ColumnDef::new(Alias::new("attachment_due_at")).timestamp().null())
                    .col(ColumnDef::new(Alias::new("attachment_reminder_count")).integer().not_null().default(0))
                    .col(ColumnDef::new(Alias::new("attachment_last_reminder_at")).timestamp().null())
                    .col(ColumnDef::new(Alias::new("attachment_export_path")).string().null())
                    .col(ColumnDef::new(Alias::new("attachment_exported_at")).timestamp().null())
                    .col(ColumnDef::new(Alias::new("attachment_override")).boolean().not_null().default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("leave_requests"), Alias::new("teacher_id"))
                            .to(Alias::new("teachers"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_leave_requests_teacher_date")
                    .table(Alias::new("leave_requests"))
                    .col(Alias::new("teacher_id"))
                    .col(Alias::new("leave_date"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("leave_requests")).to_owned())
            .await
    }
}
