//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod portfolio_repo;
pub mod template_repo;
pub mod user_repo;

pub use portfolio_repo::PortfolioRepo;
pub use template_repo::TemplateRepo;
pub use user_repo::UserRepo;
