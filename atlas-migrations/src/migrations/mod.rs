//! The ordered migration set. New migrations go at the end with the next
//! version number and a matching `sql/NNNN_name.sql` file.

mod m0001_create_users;
mod m0002_create_error_events;
mod m0003_create_brands;
mod m0004_create_pricing_plans;
mod m0005_create_blog_posts;
mod m0006_add_users_email_notifications;

pub use m0001_create_users::CreateUsers;
pub use m0002_create_error_events::CreateErrorEvents;
pub use m0003_create_brands::CreateBrands;
pub use m0004_create_pricing_plans::CreatePricingPlans;
pub use m0005_create_blog_posts::CreateBlogPosts;
pub use m0006_add_users_email_notifications::AddUsersEmailNotifications;

use crate::migration::Migration;

pub fn all() -> Vec<Box<dyn Migration>> {
    vec![
        Box::new(CreateUsers),
        Box::new(CreateErrorEvents),
        Box::new(CreateBrands),
        Box::new(CreatePricingPlans),
        Box::new(CreateBlogPosts),
        Box::new(AddUsersEmailNotifications),
    ]
}
