pub use sea_orm_migration::prelude::*;
use sea_orm_migration::{sea_orm::DbBackend, schema::{decimal_len, double}};

mod m20240601_000001_create_users;
mod m20240601_000002_create_bikes;
mod m20240601_000003_create_bookings;
mod m20240615_000001_add_lookup_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_users::Migration),
            Box::new(m20240601_000002_create_bikes::Migration),
            Box::new(m20240601_000003_create_bookings::Migration),
            Box::new(m20240615_000001_add_lookup_indexes::Migration),
        ]
    }
}

/// DECIMAL(10,2) money column. SQLite has no exact decimal storage, so it
/// gets REAL there.
pub(crate) fn money<T: IntoIden>(manager: &SchemaManager, col: T) -> ColumnDef {
    match manager.get_database_backend() {
        DbBackend::Sqlite => double(col),
        _ => decimal_len(col, 10, 2),
    }
}
