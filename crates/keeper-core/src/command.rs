//! Reversible mutations applied through the registry.
//!
//! A command is constructed with everything it needs to do its job and
//! collects whatever it needs to undo itself while applying. Each variant
//! stores only the delta it touches — never a full item snapshot — so undo
//! stays cheap and commands against unrelated items interleave safely in
//! history.
//!
//! | Command | apply | revert |
//! |---|---|---|
//! | `Create` | insert item by id | remove by id |
//! | `Complete` | set/clear the completion instant | restore the prior instant |
//! | `Archive` | set/clear the archival instant | restore the prior instant |
//! | `SetRecurring` | overwrite the flag | restore the prior flag |
//! | `ResetChecklist` | recur/archive completed items | restore both lists |
//!
//! Applying an already-applied command, or reverting one that has not been
//! applied, is a broken calling sequence and fails loudly.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::error::CommandError;
use crate::model::{Item, ItemId, Project, ProjectKind};
use crate::registry::Registry;

/// An atomic, reversible mutation of the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create(CreateCommand),
    Complete(CompleteCommand),
    Archive(ArchiveCommand),
    SetRecurring(SetRecurringCommand),
    ResetChecklist(ResetChecklistCommand),
}

impl Command {
    /// Whether this command's effect is currently in place.
    #[must_use]
    pub const fn done(&self) -> bool {
        match self {
            Self::Create(c) => c.done,
            Self::Complete(c) => c.done,
            Self::Archive(c) => c.done,
            Self::SetRecurring(c) => c.done,
            Self::ResetChecklist(c) => c.done,
        }
    }

    /// The project this command affects, for routing broadcast updates.
    ///
    /// `None` when the target item is gone from the registry (e.g. a
    /// reverted `Create`).
    #[must_use]
    pub fn project(&self, reg: &Registry) -> Option<Project> {
        match self {
            Self::Create(c) => reg
                .get(c.id)
                .map(|item| item.project().clone())
                .or_else(|| c.item.as_ref().map(|item| item.project().clone())),
            Self::Complete(c) => reg.get(c.id).map(|item| item.project().clone()),
            Self::Archive(c) => reg.get(c.id).map(|item| item.project().clone()),
            Self::SetRecurring(c) => reg.get(c.id).map(|item| item.project().clone()),
            Self::ResetChecklist(c) => Some(c.project.clone()),
        }
    }

    pub(crate) fn apply(&mut self, reg: &mut Registry) -> Result<(), CommandError> {
        match self {
            Self::Create(c) => c.apply(reg),
            Self::Complete(c) => c.apply(reg),
            Self::Archive(c) => c.apply(reg),
            Self::SetRecurring(c) => c.apply(reg),
            Self::ResetChecklist(c) => c.apply(reg),
        }
    }

    pub(crate) fn revert(&mut self, reg: &mut Registry) -> Result<(), CommandError> {
        match self {
            Self::Create(c) => c.revert(reg),
            Self::Complete(c) => c.revert(reg),
            Self::Archive(c) => c.revert(reg),
            Self::SetRecurring(c) => c.revert(reg),
            Self::ResetChecklist(c) => c.revert(reg),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create(c) => write!(f, "create {}", c.id),
            Self::Complete(c) if c.completed_at_new.is_some() => {
                write!(f, "complete {}", c.id)
            }
            Self::Complete(c) => write!(f, "uncomplete {}", c.id),
            Self::Archive(c) if c.archived_at_new.is_some() => {
                write!(f, "archive {}", c.id)
            }
            Self::Archive(c) => write!(f, "unarchive {}", c.id),
            Self::SetRecurring(c) => {
                write!(f, "set recurring={} on {}", c.recurring_new, c.id)
            }
            Self::ResetChecklist(c) => write!(f, "reset checklist {}", c.project),
        }
    }
}

/// Insert a new item; undo removes it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommand {
    id: ItemId,
    // Holds the item while the command is pending or reverted; the
    // registry owns it while the command is applied.
    item: Option<Item>,
    done: bool,
}

impl CreateCommand {
    #[must_use]
    pub fn new(item: Item) -> Command {
        Command::Create(Self {
            id: item.id(),
            item: Some(item),
            done: false,
        })
    }

    fn apply(&mut self, reg: &mut Registry) -> Result<(), CommandError> {
        if self.done {
            return Err(CommandError::AlreadyDone);
        }
        let item = self.item.take().ok_or(CommandError::AlreadyDone)?;
        reg.insert(item);
        self.done = true;
        Ok(())
    }

    fn revert(&mut self, reg: &mut Registry) -> Result<(), CommandError> {
        if !self.done {
            return Err(CommandError::NotDone);
        }
        self.item = Some(reg.take_item(self.id)?);
        self.done = false;
        Ok(())
    }
}

/// Set or clear an item's completion instant.
///
/// The new instant is fixed at construction time; the prior instant is
/// captured during apply and restored bit-for-bit on revert, so an
/// undo/redo cycle preserves the original completion moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteCommand {
    id: ItemId,
    completed_at_new: Option<DateTime<Utc>>,
    completed_at_orig: Option<Option<DateTime<Utc>>>,
    done: bool,
}

impl CompleteCommand {
    #[must_use]
    pub fn new(id: ItemId, completed: bool) -> Command {
        Command::Complete(Self {
            id,
            completed_at_new: completed.then(Utc::now),
            completed_at_orig: None,
            done: false,
        })
    }

    fn apply(&mut self, reg: &mut Registry) -> Result<(), CommandError> {
        if self.done {
            return Err(CommandError::AlreadyDone);
        }
        let item = reg.item_mut(self.id)?;
        self.completed_at_orig = Some(item.completed_at);
        item.completed_at = self.completed_at_new;
        self.done = true;
        Ok(())
    }

    fn revert(&mut self, reg: &mut Registry) -> Result<(), CommandError> {
        if !self.done {
            return Err(CommandError::NotDone);
        }
        let orig = self.completed_at_orig.take().ok_or(CommandError::NotDone)?;
        reg.item_mut(self.id)?.completed_at = orig;
        self.done = false;
        Ok(())
    }
}

/// Set or clear an item's archival instant. Mirrors [`CompleteCommand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveCommand {
    id: ItemId,
    archived_at_new: Option<DateTime<Utc>>,
    archived_at_orig: Option<Option<DateTime<Utc>>>,
    done: bool,
}

impl ArchiveCommand {
    #[must_use]
    pub fn new(id: ItemId, archived: bool) -> Command {
        Command::Archive(Self {
            id,
            archived_at_new: archived.then(Utc::now),
            archived_at_orig: None,
            done: false,
        })
    }

    fn apply(&mut self, reg: &mut Registry) -> Result<(), CommandError> {
        if self.done {
            return Err(CommandError::AlreadyDone);
        }
        let item = reg.item_mut(self.id)?;
        self.archived_at_orig = Some(item.archived_at);
        item.archived_at = self.archived_at_new;
        self.done = true;
        Ok(())
    }

    fn revert(&mut self, reg: &mut Registry) -> Result<(), CommandError> {
        if !self.done {
            return Err(CommandError::NotDone);
        }
        let orig = self.archived_at_orig.take().ok_or(CommandError::NotDone)?;
        reg.item_mut(self.id)?.archived_at = orig;
        self.done = false;
        Ok(())
    }
}

/// Overwrite an item's recurring flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetRecurringCommand {
    id: ItemId,
    recurring_new: bool,
    recurring_orig: Option<bool>,
    done: bool,
}

impl SetRecurringCommand {
    #[must_use]
    pub const fn new(id: ItemId, recurring: bool) -> Command {
        Command::SetRecurring(Self {
            id,
            recurring_new: recurring,
            recurring_orig: None,
            done: false,
        })
    }

    fn apply(&mut self, reg: &mut Registry) -> Result<(), CommandError> {
        if self.done {
            return Err(CommandError::AlreadyDone);
        }
        let item = reg.item_mut(self.id)?;
        self.recurring_orig = Some(item.recurring);
        item.recurring = self.recurring_new;
        self.done = true;
        Ok(())
    }

    fn revert(&mut self, reg: &mut Registry) -> Result<(), CommandError> {
        if !self.done {
            return Err(CommandError::NotDone);
        }
        let orig = self.recurring_orig.take().ok_or(CommandError::NotDone)?;
        reg.item_mut(self.id)?.recurring = orig;
        self.done = false;
        Ok(())
    }
}

/// Reset a checklist: completed recurring items become active again,
/// completed one-time items are archived at one shared reset instant.
///
/// Only valid against a checklist project; construction fails otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetChecklistCommand {
    project: Project,
    reset_at: DateTime<Utc>,
    archived: Vec<ItemId>,
    recurred: Vec<(ItemId, DateTime<Utc>)>,
    done: bool,
}

impl ResetChecklistCommand {
    /// # Errors
    ///
    /// [`CommandError::NotAChecklist`] unless `project` is a checklist.
    pub fn new(project: Project) -> Result<Command, CommandError> {
        if project.kind() != ProjectKind::Checklist {
            return Err(CommandError::NotAChecklist(project));
        }
        Ok(Command::ResetChecklist(Self {
            project,
            reset_at: Utc::now(),
            archived: Vec::new(),
            recurred: Vec::new(),
            done: false,
        }))
    }

    fn apply(&mut self, reg: &mut Registry) -> Result<(), CommandError> {
        if self.done {
            return Err(CommandError::AlreadyDone);
        }
        self.archived.clear();
        self.recurred.clear();

        let targets: Vec<ItemId> = reg
            .iter()
            .filter(|item| {
                !item.archived() && item.completed() && self.project.contains(item.project())
            })
            .map(Item::id)
            .collect();

        for id in targets {
            let item = reg.item_mut(id)?;
            if item.recurring {
                if let Some(completed_at) = item.completed_at.take() {
                    self.recurred.push((id, completed_at));
                }
            } else {
                item.archived_at = Some(self.reset_at);
                self.archived.push(id);
            }
        }
        self.done = true;
        Ok(())
    }

    fn revert(&mut self, reg: &mut Registry) -> Result<(), CommandError> {
        if !self.done {
            return Err(CommandError::NotDone);
        }
        for id in &self.archived {
            reg.item_mut(*id)?.archived_at = None;
        }
        for (id, completed_at) in &self.recurred {
            reg.item_mut(*id)?.completed_at = Some(*completed_at);
        }
        self.done = false;
        Ok(())
    }
}
