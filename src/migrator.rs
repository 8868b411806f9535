use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_material_dispatches_table::Migration),
            Box::new(m20240101_000002_create_batch_returns_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_material_dispatches_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_material_dispatches_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Aligned with models::material_dispatch Model
            manager
                .create_table(
                    Table::create()
                        .table(MaterialDispatches::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MaterialDispatches::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaterialDispatches::MaterialName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaterialDispatches::ToCompany)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaterialDispatches::GivenQuantity)
                                .double()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaterialDispatches::DispatchDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaterialDispatches::Wastage)
                                .string()
                                .not_null()
                                .default("0.00"),
                        )
                        .col(
                            ColumnDef::new(MaterialDispatches::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaterialDispatches::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_material_dispatches_dispatch_date")
                        .table(MaterialDispatches::Table)
                        .col(MaterialDispatches::DispatchDate)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MaterialDispatches::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum MaterialDispatches {
        Table,
        Id,
        MaterialName,
        ToCompany,
        GivenQuantity,
        DispatchDate,
        Wastage,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_batch_returns_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_batch_returns_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // No foreign key on material_id: a batch may reference a missing dispatch
            manager
                .create_table(
                    Table::create()
                        .table(BatchReturns::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(BatchReturns::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(BatchReturns::MaterialId).uuid().not_null())
                        .col(
                            ColumnDef::new(BatchReturns::ReceivedQuantity)
                                .double()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BatchReturns::ReceivedDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BatchReturns::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_batch_returns_material_id")
                        .table(BatchReturns::Table)
                        .col(BatchReturns::MaterialId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(BatchReturns::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum BatchReturns {
        Table,
        Id,
        MaterialId,
        ReceivedQuantity,
        ReceivedDate,
        CreatedAt,
    }
}
