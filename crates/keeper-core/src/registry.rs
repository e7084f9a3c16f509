//! The authoritative in-memory item store.
//!
//! All mutation flows through [`Registry::execute`] with a [`Command`];
//! nothing else writes to an item after creation. The registry keeps the
//! classic pair of stacks: executing a new command clears the redo stack,
//! `undo` moves a command from the undo stack to the redo stack, `redo`
//! moves it back.

use std::collections::HashMap;
use std::fmt;

use crate::command::Command;
use crate::error::CommandError;
use crate::model::{Item, ItemId, Project};
use crate::view::View;

#[derive(Debug, Default)]
pub struct Registry {
    items: HashMap<ItemId, Item>,
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item directly, bypassing command history.
    ///
    /// Used when reloading from the store and in tests; interactive
    /// creation goes through [`crate::command::CreateCommand`] so it can
    /// be undone.
    pub fn add(&mut self, item: Item) {
        self.items.insert(item.id(), item);
    }

    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Unordered iteration over every item, archived included.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Every item, archived included, in display order: completed items
    /// last, then case-insensitive by description.
    #[must_use]
    pub fn all_items(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items.values().collect();
        items.sort_by_key(|item| (item.completed(), item.description().to_lowercase()));
        items
    }

    /// Active (non-archived) items in display order.
    #[must_use]
    pub fn items(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self
            .items
            .values()
            .filter(|item| !item.archived())
            .collect();
        items.sort_by_key(|item| (item.completed(), item.description().to_lowercase()));
        items
    }

    /// Snapshot view of the active items living under `project`.
    #[must_use]
    pub fn view(&self, project: &Project) -> View {
        let items = self
            .items()
            .into_iter()
            .filter(|item| project.contains(item.project()))
            .cloned();
        View::from_filtered(items, project.clone())
    }

    /// Execute a command: apply it, push it onto the undo stack, and clear
    /// the redo stack. A failed apply leaves the registry and both stacks
    /// untouched.
    ///
    /// # Errors
    ///
    /// Propagates [`CommandError`] from the command's apply step.
    pub fn execute(&mut self, mut command: Command) -> Result<(), CommandError> {
        command.apply(self)?;
        self.redo_stack.clear();
        self.undo_stack.push(command);
        Ok(())
    }

    /// Revert the most recent command and move it to the redo stack.
    ///
    /// # Errors
    ///
    /// [`CommandError::NothingToUndo`] on an empty undo stack; otherwise
    /// propagates the command's revert error, leaving the stacks as found.
    pub fn undo(&mut self) -> Result<(), CommandError> {
        let mut command = self.undo_stack.pop().ok_or(CommandError::NothingToUndo)?;
        match command.revert(self) {
            Ok(()) => {
                self.redo_stack.push(command);
                Ok(())
            }
            Err(err) => {
                self.undo_stack.push(command);
                Err(err)
            }
        }
    }

    /// Re-apply the most recently undone command and move it back to the
    /// undo stack. The redo path does not clear the redo stack.
    ///
    /// # Errors
    ///
    /// [`CommandError::NothingToRedo`] on an empty redo stack; otherwise
    /// propagates the command's apply error, leaving the stacks as found.
    pub fn redo(&mut self) -> Result<(), CommandError> {
        let mut command = self.redo_stack.pop().ok_or(CommandError::NothingToRedo)?;
        match command.apply(self) {
            Ok(()) => {
                self.undo_stack.push(command);
                Ok(())
            }
            Err(err) => {
                self.redo_stack.push(command);
                Err(err)
            }
        }
    }

    /// Read-only peek at the tops of both history stacks.
    #[must_use]
    pub fn undo_view(&self) -> UndoView<'_> {
        UndoView {
            next_undo: self.undo_stack.last(),
            next_redo: self.redo_stack.last(),
        }
    }

    // Mutation accessors for the command engine. Keeping these
    // crate-private is what makes the registry the sole writer of items.

    pub(crate) fn insert(&mut self, item: Item) {
        self.items.insert(item.id(), item);
    }

    pub(crate) fn take_item(&mut self, id: ItemId) -> Result<Item, CommandError> {
        self.items.remove(&id).ok_or(CommandError::NotFound(id))
    }

    pub(crate) fn item_mut(&mut self, id: ItemId) -> Result<&mut Item, CommandError> {
        self.items.get_mut(&id).ok_or(CommandError::NotFound(id))
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self.all_items() {
            writeln!(f, "{item}")?;
        }
        Ok(())
    }
}

/// What the undo/redo controls would act on right now.
#[derive(Debug, Clone, Copy)]
pub struct UndoView<'a> {
    next_undo: Option<&'a Command>,
    next_redo: Option<&'a Command>,
}

impl<'a> UndoView<'a> {
    /// The command `undo` would revert, if any.
    #[must_use]
    pub const fn next_undo(&self) -> Option<&'a Command> {
        self.next_undo
    }

    /// The command `redo` would re-apply, if any.
    #[must_use]
    pub const fn next_redo(&self) -> Option<&'a Command> {
        self.next_redo
    }
}

#[cfg(test)]
mod tests {
    use super::Registry;
    use crate::command::{
        ArchiveCommand, CompleteCommand, CreateCommand, ResetChecklistCommand,
        SetRecurringCommand,
    };
    use crate::error::CommandError;
    use crate::model::{Item, Project, ProjectKind};

    fn checklist(name: &str) -> Project {
        Project::new(name, ProjectKind::Checklist)
    }

    #[test]
    fn add_makes_item_visible() {
        let mut reg = Registry::new();
        let item = Item::new("test");
        let id = item.id();
        reg.add(item);
        assert_eq!(reg.len(), 1);
        assert!(reg.get(id).is_some());
    }

    #[test]
    fn create_command_round_trips() {
        let mut reg = Registry::new();
        let item = Item::new("test");
        let id = item.id();

        reg.execute(CreateCommand::new(item)).expect("create");
        assert!(reg.get(id).is_some());

        reg.undo().expect("undo");
        assert!(reg.get(id).is_none());

        reg.redo().expect("redo");
        assert!(reg.get(id).is_some());
    }

    #[test]
    fn complete_command_round_trips_bit_for_bit() {
        let mut reg = Registry::new();
        let item = Item::new("test");
        let id = item.id();
        reg.add(item);
        let before = reg.get(id).expect("item").clone();

        reg.execute(CompleteCommand::new(id, true)).expect("complete");
        assert!(reg.get(id).expect("item").completed());

        reg.undo().expect("undo");
        assert_eq!(reg.get(id).expect("item"), &before);
    }

    #[test]
    fn archive_command_round_trips() {
        let mut reg = Registry::new();
        let item = Item::new("test");
        let id = item.id();
        reg.add(item);

        reg.execute(ArchiveCommand::new(id, true)).expect("archive");
        assert!(reg.get(id).expect("item").archived());

        reg.undo().expect("undo");
        assert!(!reg.get(id).expect("item").archived());
    }

    #[test]
    fn set_recurring_round_trips() {
        let mut reg = Registry::new();
        let item = Item::new("test");
        let id = item.id();
        reg.add(item);

        reg.execute(SetRecurringCommand::new(id, true))
            .expect("set recurring");
        assert!(reg.get(id).expect("item").recurring());

        reg.undo().expect("undo");
        assert!(!reg.get(id).expect("item").recurring());
    }

    #[test]
    fn undo_before_any_command_fails() {
        let mut reg = Registry::new();
        assert_eq!(reg.undo(), Err(CommandError::NothingToUndo));
    }

    #[test]
    fn redo_before_any_undo_fails() {
        let mut reg = Registry::new();
        assert_eq!(reg.redo(), Err(CommandError::NothingToRedo));
    }

    #[test]
    fn double_undo_fails() {
        let mut reg = Registry::new();
        reg.execute(CreateCommand::new(Item::new("test")))
            .expect("create");
        reg.undo().expect("undo");
        assert_eq!(reg.undo(), Err(CommandError::NothingToUndo));
    }

    #[test]
    fn new_command_clears_the_redo_stack() {
        let mut reg = Registry::new();
        let a = Item::new("a");
        reg.execute(CreateCommand::new(a)).expect("create a");
        reg.undo().expect("undo a");

        reg.execute(CreateCommand::new(Item::new("b")))
            .expect("create b");
        assert_eq!(reg.redo(), Err(CommandError::NothingToRedo));
    }

    #[test]
    fn failed_command_leaves_history_untouched() {
        let mut reg = Registry::new();
        reg.execute(CreateCommand::new(Item::new("a"))).expect("create");
        reg.undo().expect("undo");

        // NotFound: the target item is not in the registry.
        let ghost = Item::new("ghost");
        let err = reg
            .execute(CompleteCommand::new(ghost.id(), true))
            .expect_err("missing item");
        assert!(matches!(err, CommandError::NotFound(_)));

        // The redo stack survived the failed execute.
        reg.redo().expect("redo still available");
    }

    #[test]
    fn items_sort_completed_last_then_by_description() {
        let mut reg = Registry::new();
        let banana = Item::new("Banana");
        let apple = Item::new("apple");
        let carrot = Item::new("carrot");
        let carrot_id = carrot.id();
        reg.add(banana);
        reg.add(apple);
        reg.add(carrot);
        reg.execute(CompleteCommand::new(carrot_id, true))
            .expect("complete carrot");

        let order: Vec<&str> = reg.items().iter().map(|i| i.description()).collect();
        assert_eq!(order, vec!["apple", "Banana", "carrot"]);
    }

    #[test]
    fn archived_items_are_hidden_from_items_but_not_all_items() {
        let mut reg = Registry::new();
        let item = Item::new("test");
        let id = item.id();
        reg.add(item);
        reg.execute(ArchiveCommand::new(id, true)).expect("archive");

        assert!(reg.items().is_empty());
        assert_eq!(reg.all_items().len(), 1);
    }

    #[test]
    fn reset_checklist_archives_onetime_and_recurs_recurring() {
        let mut reg = Registry::new();
        let onetime = Item::new("onetime").with_project(checklist("grocery"));
        let recurring = Item::new("recurring")
            .with_project(checklist("grocery.produce"))
            .with_recurring(true);
        let untouched = Item::new("untouched").with_project(checklist("grocery"));
        let onetime_id = onetime.id();
        let recurring_id = recurring.id();
        let untouched_id = untouched.id();
        reg.add(onetime);
        reg.add(recurring);
        reg.add(untouched);
        reg.execute(CompleteCommand::new(onetime_id, true))
            .expect("complete onetime");
        reg.execute(CompleteCommand::new(recurring_id, true))
            .expect("complete recurring");
        let pre_reset = reg.get(recurring_id).expect("item").clone();

        let cmd = ResetChecklistCommand::new(checklist("grocery")).expect("checklist");
        reg.execute(cmd).expect("reset");

        let onetime = reg.get(onetime_id).expect("item");
        assert!(onetime.archived());
        assert!(onetime.completed());

        let recurring = reg.get(recurring_id).expect("item");
        assert!(!recurring.completed());
        assert!(!recurring.archived());

        let untouched = reg.get(untouched_id).expect("item");
        assert!(!untouched.completed());
        assert!(!untouched.archived());

        reg.undo().expect("undo reset");
        assert!(!reg.get(onetime_id).expect("item").archived());
        assert_eq!(reg.get(recurring_id).expect("item"), &pre_reset);
    }

    #[test]
    fn undo_view_tracks_both_stack_tops() {
        let mut reg = Registry::new();
        assert!(reg.undo_view().next_undo().is_none());
        assert!(reg.undo_view().next_redo().is_none());

        reg.execute(CreateCommand::new(Item::new("test")))
            .expect("create");
        assert!(reg.undo_view().next_undo().is_some());
        assert!(reg.undo_view().next_redo().is_none());

        reg.undo().expect("undo");
        assert!(reg.undo_view().next_undo().is_none());
        assert!(reg.undo_view().next_redo().is_some());
    }

    #[test]
    fn display_lists_one_line_per_item() {
        let mut reg = Registry::new();
        reg.add(Item::new("alpha"));
        reg.add(Item::new("beta"));
        let rendered = reg.to_string();
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.contains("alpha"));
    }
}
