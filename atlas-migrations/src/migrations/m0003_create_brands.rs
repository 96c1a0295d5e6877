use crate::migration::{Migration, SchemaObject};

pub struct CreateBrands;

impl Migration for CreateBrands {
    fn version(&self) -> i64 {
        3
    }

    fn name(&self) -> &'static str {
        "create_brands"
    }

    fn up_sql(&self) -> &'static str {
        include_str!("../../sql/0003_create_brands.sql")
    }

    fn down_sql(&self) -> &'static str {
        "DROP TABLE IF EXISTS brands;"
    }

    fn creates(&self) -> SchemaObject {
        SchemaObject::Table("brands")
    }
}
