use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{schema_migrations, users};

// --- Migration ledger ---

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = schema_migrations, primary_key(version))]
pub struct AppliedMigration {
    pub version: i64,
    pub name: String,
    pub checksum: String,
    pub applied_at: DateTime<Utc>,
    /// The migration's object already existed, so nothing was run and
    /// reverting only forgets the row.
    pub adopted: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = schema_migrations)]
pub struct NewAppliedMigration<'a> {
    pub version: i64,
    pub name: &'a str,
    pub checksum: &'a str,
    pub adopted: bool,
}

// --- Users ---

#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = users)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email_notifications: serde_json::Value,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub display_name: Option<&'a str>,
}

/// Per-category email opt-ins stored in `users.email_notifications`.
///
/// Missing keys fall back to the column default, so rows written before a
/// category existed still deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailNotifications {
    pub security: bool,
    pub billing: bool,
    pub activity: bool,
    pub marketing: bool,
}

impl Default for EmailNotifications {
    fn default() -> Self {
        Self {
            security: true,
            billing: true,
            activity: false,
            marketing: false,
        }
    }
}

impl User {
    pub fn email_notifications(&self) -> Result<EmailNotifications, serde_json::Error> {
        EmailNotifications::deserialize(&self.email_notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_literal() {
        let value = serde_json::to_value(EmailNotifications::default()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "security": true,
                "billing": true,
                "activity": false,
                "marketing": false,
            })
        );
    }

    #[test]
    fn partial_object_fills_from_default() {
        let prefs: EmailNotifications =
            serde_json::from_value(serde_json::json!({ "marketing": true })).unwrap();
        assert!(prefs.security);
        assert!(prefs.billing);
        assert!(!prefs.activity);
        assert!(prefs.marketing);
    }

    #[test]
    fn user_exposes_typed_preferences() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@example.com".into(),
            display_name: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            email_notifications: serde_json::json!({ "activity": true, "billing": false }),
        };
        let prefs = user.email_notifications().unwrap();
        assert!(prefs.activity);
        assert!(!prefs.billing);
    }
}
