//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Fields that distinguish "clear this value" from "leave unchanged" use
//! `Option<Option<T>>`: outer `None` = untouched, `Some(None)` = clear.

pub mod portfolio;
pub mod template;
pub mod user;
