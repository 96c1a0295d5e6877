use crate::migration::{Migration, SchemaObject};

/// Baseline `users` table that later migrations extend.
pub struct CreateUsers;

impl Migration for CreateUsers {
    fn version(&self) -> i64 {
        1
    }

    fn name(&self) -> &'static str {
        "create_users"
    }

    fn up_sql(&self) -> &'static str {
        include_str!("../../sql/0001_create_users.sql")
    }

    fn down_sql(&self) -> &'static str {
        "DROP TABLE IF EXISTS users;"
    }

    fn creates(&self) -> SchemaObject {
        SchemaObject::Table("users")
    }
}
