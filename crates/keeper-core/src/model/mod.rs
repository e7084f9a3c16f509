//! Core data model: projects and list items.

pub mod item;
pub mod project;

pub use item::{Item, ItemId, ParseEnumError, Priority};
pub use project::{Project, ProjectKind};
