pub mod image;
pub mod portfolio;
pub mod template;
