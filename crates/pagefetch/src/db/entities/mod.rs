//! Database entities.

pub mod page_job;
pub mod product;

pub use page_job::Entity as PageJob;
pub use product::Entity as Product;
