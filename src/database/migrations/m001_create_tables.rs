use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::DisplayName).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Create companies table
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Companies::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Companies::Name).string().not_null())
                    .col(ColumnDef::new(Companies::Domain).string().not_null())
                    .col(ColumnDef::new(Companies::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Companies::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Create projects table
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Projects::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Projects::CompanyId).integer().not_null())
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(ColumnDef::new(Projects::Description).string())
                    .col(ColumnDef::new(Projects::ProjectType).string().not_null())
                    .col(ColumnDef::new(Projects::ProjectDirection).string().not_null())
                    .col(ColumnDef::new(Projects::ProjectKind).string().not_null())
                    .col(
                        ColumnDef::new(Projects::SupervisorIds)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Projects::AgentIds)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Projects::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Projects::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Projects::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_projects_company_id")
                            .from(Projects::Table, Projects::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create workbooks table
        manager
            .create_table(
                Table::create()
                    .table(Workbooks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Workbooks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Workbooks::ProjectId).integer().not_null())
                    .col(ColumnDef::new(Workbooks::Name).string().not_null())
                    .col(ColumnDef::new(Workbooks::Description).string())
                    .col(
                        ColumnDef::new(Workbooks::AgentIds)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Workbooks::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Workbooks::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Workbooks::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workbooks_project_id")
                            .from(Workbooks::Table, Workbooks::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create sheets table
        manager
            .create_table(
                Table::create()
                    .table(Sheets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sheets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sheets::WorkbookId).integer().not_null())
                    .col(ColumnDef::new(Sheets::ProjectId).integer().not_null())
                    .col(ColumnDef::new(Sheets::Name).string().not_null())
                    .col(ColumnDef::new(Sheets::Description).string())
                    .col(
                        ColumnDef::new(Sheets::AgentIds)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Sheets::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Sheets::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Sheets::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sheets_workbook_id")
                            .from(Sheets::Table, Sheets::WorkbookId)
                            .to(Workbooks::Table, Workbooks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sheets_project_id")
                            .from(Sheets::Table, Sheets::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create sheet_columns table
        manager
            .create_table(
                Table::create()
                    .table(SheetColumns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SheetColumns::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SheetColumns::SheetId).integer().not_null())
                    .col(ColumnDef::new(SheetColumns::Name).string().not_null())
                    .col(ColumnDef::new(SheetColumns::DataKey).string().not_null())
                    .col(ColumnDef::new(SheetColumns::ColumnType).string().not_null())
                    .col(
                        ColumnDef::new(SheetColumns::VisibleToUser)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SheetColumns::EditableByUser)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SheetColumns::IsRequired)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(SheetColumns::Order).integer().not_null())
                    .col(ColumnDef::new(SheetColumns::Options).text())
                    .col(ColumnDef::new(SheetColumns::PhoneNumbers).text())
                    .col(
                        ColumnDef::new(SheetColumns::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(SheetColumns::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(SheetColumns::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sheet_columns_sheet_id")
                            .from(SheetColumns::Table, SheetColumns::SheetId)
                            .to(Sheets::Table, Sheets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create sheet_rows table
        manager
            .create_table(
                Table::create()
                    .table(SheetRows::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SheetRows::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SheetRows::SheetId).integer().not_null())
                    .col(ColumnDef::new(SheetRows::RowNumber).big_integer().not_null())
                    .col(
                        ColumnDef::new(SheetRows::Data)
                            .text()
                            .not_null()
                            .default("{}"),
                    )
                    .col(ColumnDef::new(SheetRows::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(SheetRows::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sheet_rows_sheet_id")
                            .from(SheetRows::Table, SheetRows::SheetId)
                            .to(Sheets::Table, Sheets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One row number per sheet
        manager
            .create_index(
                Index::create()
                    .name("idx_sheet_rows_sheet_id_row_number")
                    .table(SheetRows::Table)
                    .col(SheetRows::SheetId)
                    .col(SheetRows::RowNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create row_grants table
        manager
            .create_table(
                Table::create()
                    .table(RowGrants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RowGrants::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RowGrants::SheetId).integer().not_null())
                    .col(ColumnDef::new(RowGrants::AgentId).integer().not_null())
                    .col(ColumnDef::new(RowGrants::StartRow).big_integer().not_null())
                    .col(ColumnDef::new(RowGrants::EndRow).big_integer().not_null())
                    .col(ColumnDef::new(RowGrants::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_row_grants_sheet_id")
                            .from(RowGrants::Table, RowGrants::SheetId)
                            .to(Sheets::Table, Sheets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create operation_logs table
        manager
            .create_table(
                Table::create()
                    .table(OperationLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OperationLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OperationLogs::ActorId).integer().not_null())
                    .col(ColumnDef::new(OperationLogs::Op).string().not_null())
                    .col(ColumnDef::new(OperationLogs::SheetId).integer().not_null())
                    .col(ColumnDef::new(OperationLogs::DataKey).string())
                    .col(ColumnDef::new(OperationLogs::OldValue).text())
                    .col(ColumnDef::new(OperationLogs::NewValue).text())
                    .col(ColumnDef::new(OperationLogs::At).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OperationLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RowGrants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SheetRows::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SheetColumns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sheets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Workbooks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    DisplayName,
    Role,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Companies {
    Table,
    Id,
    Name,
    Domain,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Projects {
    Table,
    Id,
    CompanyId,
    Name,
    Description,
    ProjectType,
    ProjectDirection,
    ProjectKind,
    SupervisorIds,
    AgentIds,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Workbooks {
    Table,
    Id,
    ProjectId,
    Name,
    Description,
    AgentIds,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Sheets {
    Table,
    Id,
    WorkbookId,
    ProjectId,
    Name,
    Description,
    AgentIds,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SheetColumns {
    Table,
    Id,
    SheetId,
    Name,
    DataKey,
    ColumnType,
    VisibleToUser,
    EditableByUser,
    IsRequired,
    Order,
    Options,
    PhoneNumbers,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SheetRows {
    Table,
    Id,
    SheetId,
    RowNumber,
    Data,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum RowGrants {
    Table,
    Id,
    SheetId,
    AgentId,
    StartRow,
    EndRow,
    CreatedAt,
}

#[derive(Iden)]
enum OperationLogs {
    Table,
    Id,
    ActorId,
    Op,
    SheetId,
    DataKey,
    OldValue,
    NewValue,
    At,
}
