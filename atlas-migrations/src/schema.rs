// Mirrors the tables created by sql/*.sql plus the migration ledger.

diesel::table! {
    schema_migrations (version) {
        version -> Int8,
        #[max_length = 255]
        name -> Varchar,
        #[max_length = 64]
        checksum -> Varchar,
        applied_at -> Timestamptz,
        adopted -> Bool,
    }
}

diesel::table! {
    users (id) {
        id -> Uuid,
        #[max_length = 255]
        email -> Varchar,
        #[max_length = 100]
        display_name -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        email_notifications -> Jsonb,
    }
}

diesel::table! {
    error_events (id) {
        id -> Uuid,
        #[max_length = 16]
        level -> Varchar,
        #[max_length = 50]
        source -> Varchar,
        message -> Text,
        stack -> Nullable<Text>,
        #[max_length = 64]
        fingerprint -> Nullable<Varchar>,
        #[max_length = 2048]
        request_path -> Nullable<Varchar>,
        #[max_length = 512]
        user_agent -> Nullable<Varchar>,
        context -> Jsonb,
        user_id -> Nullable<Uuid>,
        occurred_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    brands (id) {
        id -> Uuid,
        #[max_length = 100]
        slug -> Varchar,
        #[max_length = 255]
        name -> Varchar,
        logo_url -> Nullable<Text>,
        #[max_length = 7]
        primary_color -> Nullable<Varchar>,
        website_url -> Nullable<Text>,
        is_active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    pricing_plans (id) {
        id -> Uuid,
        #[max_length = 100]
        slug -> Varchar,
        #[max_length = 255]
        name -> Varchar,
        description -> Nullable<Text>,
        price_cents -> Int4,
        #[max_length = 3]
        currency -> Varchar,
        #[max_length = 16]
        billing_interval -> Varchar,
        features -> Jsonb,
        is_active -> Bool,
        sort_order -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    blog_posts (id) {
        id -> Uuid,
        #[max_length = 200]
        slug -> Varchar,
        #[max_length = 300]
        title -> Varchar,
        excerpt -> Nullable<Text>,
        body -> Text,
        cover_image_url -> Nullable<Text>,
        author_id -> Nullable<Uuid>,
        #[max_length = 16]
        status -> Varchar,
        published_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(error_events -> users (user_id));
diesel::joinable!(blog_posts -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(
    schema_migrations,
    users,
    error_events,
    brands,
    pricing_plans,
    blog_posts,
);
