//! Runs the bundled migrations against a real PostgreSQL database.
//!
//! Set `ATLAS_TEST_DATABASE_URL` to a throwaway database to enable these
//! tests; without it they return early. Tests share one database, so they
//! serialize on a lock.

use std::sync::Mutex;

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::Text;

use atlas_migrations::models::{EmailNotifications, NewUser, User};
use atlas_migrations::schema::{blog_posts, brands, error_events, pricing_plans, users};
use atlas_migrations::{MigrationStore, Migrator, SchemaObject};

static DB_LOCK: Mutex<()> = Mutex::new(());

#[derive(QueryableByName, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct ColumnRow {
    #[diesel(sql_type = Text)]
    table_name: String,
    #[diesel(sql_type = Text)]
    column_name: String,
}

#[derive(QueryableByName)]
struct EmailRow {
    #[diesel(sql_type = Text)]
    email: String,
}

fn connect() -> Option<PgConnection> {
    let url = std::env::var("ATLAS_TEST_DATABASE_URL").ok()?;
    Some(PgConnection::establish(&url).expect("test database is reachable"))
}

/// Every column in the public schema, sorted.
fn schema_snapshot(conn: &mut PgConnection) -> Vec<ColumnRow> {
    let mut rows = diesel::sql_query(
        "SELECT table_name::text AS table_name, column_name::text AS column_name \
         FROM information_schema.columns WHERE table_schema = 'public' \
         AND table_name <> 'schema_migrations'",
    )
    .load::<ColumnRow>(conn)
    .expect("information_schema query");
    rows.sort();
    rows
}

fn reset(conn: &mut PgConnection, migrator: &Migrator) {
    let applied = conn.applied().unwrap_or_default();
    if !applied.is_empty() {
        migrator.revert(conn, usize::MAX).expect("revert to empty");
    }
}

#[test]
fn each_migration_round_trips() {
    let _guard = DB_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let Some(mut conn) = connect() else { return };
    let migrator = Migrator::bundled().unwrap();
    conn.ensure_ledger().unwrap();
    reset(&mut conn, &migrator);

    for m in migrator.migrations() {
        let before = schema_snapshot(&mut conn);
        m.up(&mut conn).unwrap();
        assert_ne!(schema_snapshot(&mut conn), before, "{} changed nothing", m.name());
        m.down(&mut conn).unwrap();
        assert_eq!(schema_snapshot(&mut conn), before, "{} did not restore the schema", m.name());
        // leave it applied so the next migration has its prerequisites
        m.up(&mut conn).unwrap();
    }

    for m in migrator.migrations().collect::<Vec<_>>().into_iter().rev() {
        m.down(&mut conn).unwrap();
    }
    assert!(schema_snapshot(&mut conn).is_empty());
}

#[test]
fn migrated_schema_matches_diesel_tables() {
    let _guard = DB_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let Some(mut conn) = connect() else { return };
    let migrator = Migrator::bundled().unwrap();
    conn.ensure_ledger().unwrap();
    reset(&mut conn, &migrator);

    assert_eq!(migrator.run_pending(&mut conn).unwrap(), vec![1, 2, 3, 4, 5, 6]);
    assert!(migrator.verify(&mut conn).unwrap().is_empty());

    let user: User = diesel::insert_into(users::table)
        .values(&NewUser { email: "reader@example.com", display_name: Some("Reader") })
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(user.email_notifications().unwrap(), EmailNotifications::default());

    diesel::insert_into(error_events::table)
        .values((
            error_events::source.eq("web"),
            error_events::message.eq("TypeError: x is undefined"),
            error_events::user_id.eq(Some(user.id)),
        ))
        .execute(&mut conn)
        .unwrap();
    diesel::insert_into(brands::table)
        .values((brands::slug.eq("acme"), brands::name.eq("Acme")))
        .execute(&mut conn)
        .unwrap();
    diesel::insert_into(pricing_plans::table)
        .values((
            pricing_plans::slug.eq("pro"),
            pricing_plans::name.eq("Pro"),
            pricing_plans::price_cents.eq(1900),
            pricing_plans::billing_interval.eq("month"),
        ))
        .execute(&mut conn)
        .unwrap();
    diesel::insert_into(blog_posts::table)
        .values((
            blog_posts::slug.eq("hello"),
            blog_posts::title.eq("Hello"),
            blog_posts::body.eq("First post"),
            blog_posts::author_id.eq(Some(user.id)),
        ))
        .execute(&mut conn)
        .unwrap();

    let bad_interval = diesel::insert_into(pricing_plans::table)
        .values((
            pricing_plans::slug.eq("weird"),
            pricing_plans::name.eq("Weird"),
            pricing_plans::billing_interval.eq("fortnight"),
        ))
        .execute(&mut conn);
    assert!(bad_interval.is_err());

    let status: String = blog_posts::table
        .select(blog_posts::status)
        .first(&mut conn)
        .unwrap();
    assert_eq!(status, "draft");

    migrator.revert(&mut conn, usize::MAX).unwrap();
    assert!(conn.applied().unwrap().is_empty());
}

#[test]
fn preexisting_users_table_is_never_dropped() {
    let _guard = DB_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let Some(mut conn) = connect() else { return };
    let migrator = Migrator::bundled().unwrap();
    conn.ensure_ledger().unwrap();
    reset(&mut conn, &migrator);
    // An earlier round may have left an adopted users table behind.
    conn.batch_execute("DROP TABLE IF EXISTS users CASCADE").unwrap();

    conn.batch_execute(
        "CREATE TABLE users (id UUID PRIMARY KEY DEFAULT gen_random_uuid(), \
         email VARCHAR(255) NOT NULL UNIQUE, display_name VARCHAR(100), \
         created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(), \
         updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()); \
         INSERT INTO users (email) VALUES ('existing@example.com');",
    )
    .unwrap();

    migrator.run_pending(&mut conn).unwrap();
    assert!(conn.applied().unwrap()[0].adopted);
    migrator.revert(&mut conn, usize::MAX).unwrap();

    assert!(conn.object_exists(&SchemaObject::Table("users")).unwrap());
    assert!(!conn
        .object_exists(&SchemaObject::Column { table: "users", column: "email_notifications" })
        .unwrap());
    let emails: Vec<String> = diesel::sql_query("SELECT email FROM users")
        .load::<EmailRow>(&mut conn)
        .unwrap()
        .into_iter()
        .map(|r| r.email)
        .collect();
    assert_eq!(emails, vec!["existing@example.com"]);

    conn.batch_execute("DROP TABLE users").unwrap();
}
