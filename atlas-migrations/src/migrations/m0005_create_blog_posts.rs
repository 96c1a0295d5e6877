use crate::migration::{Migration, SchemaObject};

/// Admin-managed blog content.
pub struct CreateBlogPosts;

impl Migration for CreateBlogPosts {
    fn version(&self) -> i64 {
        5
    }

    fn name(&self) -> &'static str {
        "create_blog_posts"
    }

    fn up_sql(&self) -> &'static str {
        include_str!("../../sql/0005_create_blog_posts.sql")
    }

    fn down_sql(&self) -> &'static str {
        "DROP TABLE IF EXISTS blog_posts;"
    }

    fn creates(&self) -> SchemaObject {
        SchemaObject::Table("blog_posts")
    }
}
