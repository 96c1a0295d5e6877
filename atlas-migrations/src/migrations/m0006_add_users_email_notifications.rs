use crate::migration::{Migration, SchemaObject};

/// Per-category email preferences on `users`, see [`EmailNotifications`](crate::models::EmailNotifications).
pub struct AddUsersEmailNotifications;

impl Migration for AddUsersEmailNotifications {
    fn version(&self) -> i64 {
        6
    }

    fn name(&self) -> &'static str {
        "add_users_email_notifications"
    }

    fn up_sql(&self) -> &'static str {
        include_str!("../../sql/0006_add_users_email_notifications.sql")
    }

    fn down_sql(&self) -> &'static str {
        "ALTER TABLE users DROP COLUMN IF EXISTS email_notifications;"
    }

    fn creates(&self) -> SchemaObject {
        SchemaObject::Column {
            table: "users",
            column: "email_notifications",
        }
    }
}
