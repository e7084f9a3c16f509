//! Typed errors for the command engine, views, and the SQLite store.

use thiserror::Error;

use crate::model::{ItemId, Project};

/// Failure modes of command issuance and the undo/redo stacks.
///
/// Every variant signals a broken calling sequence or a bad reference, and
/// is returned before any mutation takes place — a failed command leaves
/// the registry untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// `apply` was called on a command whose effect is already in place.
    #[error("command has already been applied")]
    AlreadyDone,

    /// `revert` was called on a command that has not been applied.
    #[error("command has not been applied")]
    NotDone,

    /// The command references an item the registry does not hold.
    #[error("no item with id {0}")]
    NotFound(ItemId),

    /// A checklist-only command was aimed at a non-checklist project.
    #[error("project '{0}' is not a checklist")]
    NotAChecklist(Project),

    /// `undo` with an empty undo stack.
    #[error("nothing to undo")]
    NothingToUndo,

    /// `redo` with an empty redo stack.
    #[error("nothing to redo")]
    NothingToRedo,
}

/// Failure to construct a [`crate::view::View`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// The items' common root is not contained by the view's anchor, i.e.
    /// an unrelated item leaked into the view.
    #[error("items rooted at '{root}' do not belong under anchor '{anchor}'")]
    ForeignItem { root: Project, anchor: Project },
}

/// Failures of the SQLite store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored timestamp carried no timezone offset. Naive timestamps are
    /// rejected loudly rather than guessed at.
    #[error("naive timestamp '{value}' in column '{column}'")]
    NaiveTimestamp { column: &'static str, value: String },

    /// A stored row failed to decode into an item field.
    #[error("corrupt row for column '{column}': {message}")]
    CorruptRow { column: &'static str, message: String },
}

#[cfg(test)]
mod tests {
    use super::{CommandError, StoreError};
    use crate::model::ItemId;

    #[test]
    fn command_errors_render_for_humans() {
        let id = ItemId::generate();
        assert!(CommandError::NotFound(id).to_string().contains(&id.to_string()));
        assert_eq!(
            CommandError::NothingToUndo.to_string(),
            "nothing to undo"
        );
    }

    #[test]
    fn naive_timestamp_error_names_the_column() {
        let err = StoreError::NaiveTimestamp {
            column: "completed_at",
            value: "2020-01-01T00:00:00".into(),
        };
        assert!(err.to_string().contains("completed_at"));
    }
}
