//! keeper-core: the list-management engine.
//!
//! The registry owns every item and is mutated exclusively through
//! reversible commands with full undo/redo history. Projects form a dotted
//! hierarchical namespace used both to scope items into views and to route
//! broadcast updates; the SQLite store persists the whole registry as one
//! row per item.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums per subsystem; no panicking APIs.
//! - **Logging**: `tracing` macros (`warn!`, `debug!`).

pub mod command;
pub mod db;
pub mod error;
pub mod model;
pub mod registry;
pub mod view;

pub use command::{
    ArchiveCommand, Command, CompleteCommand, CreateCommand, ResetChecklistCommand,
    SetRecurringCommand,
};
pub use db::ListStore;
pub use error::{CommandError, StoreError, ViewError};
pub use model::{Item, ItemId, Priority, Project, ProjectKind};
pub use registry::{Registry, UndoView};
pub use view::View;
