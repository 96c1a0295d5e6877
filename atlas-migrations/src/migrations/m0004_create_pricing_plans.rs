use crate::migration::{Migration, SchemaObject};

/// Plans are managed in the database rather than hardcoded.
pub struct CreatePricingPlans;

impl Migration for CreatePricingPlans {
    fn version(&self) -> i64 {
        4
    }

    fn name(&self) -> &'static str {
        "create_pricing_plans"
    }

    fn up_sql(&self) -> &'static str {
        include_str!("../../sql/0004_create_pricing_plans.sql")
    }

    fn down_sql(&self) -> &'static str {
        "DROP TABLE IF EXISTS pricing_plans;"
    }

    fn creates(&self) -> SchemaObject {
        SchemaObject::Table("pricing_plans")
    }
}
