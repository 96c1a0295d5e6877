use crate::migration::{Migration, SchemaObject};

/// Client and server error reports.
pub struct CreateErrorEvents;

impl Migration for CreateErrorEvents {
    fn version(&self) -> i64 {
        2
    }

    fn name(&self) -> &'static str {
        "create_error_events"
    }

    fn up_sql(&self) -> &'static str {
        include_str!("../../sql/0002_create_error_events.sql")
    }

    fn down_sql(&self) -> &'static str {
        "DROP TABLE IF EXISTS error_events;"
    }

    fn creates(&self) -> SchemaObject {
        SchemaObject::Table("error_events")
    }
}
