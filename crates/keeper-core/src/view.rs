//! Read-only, filtered projections over a snapshot of items.
//!
//! A [`View`] owns clones of the items it was built from — it never holds
//! live references into the registry and never mutates anything. Narrowing
//! operations return fresh views over the narrowed snapshot.

use crate::error::ViewError;
use crate::model::{Item, Project};

/// A derived, read-only sequence of items anchored at a project.
#[derive(Debug, Clone)]
pub struct View {
    items: Vec<Item>,
    project: Project,
}

impl View {
    /// Build a view, checking that the items actually belong under the
    /// anchor: the common root of the items' projects must be contained by
    /// `project`. An empty snapshot is trivially valid.
    ///
    /// # Errors
    ///
    /// [`ViewError::ForeignItem`] when an unrelated item leaked in.
    pub fn new(
        items: impl IntoIterator<Item = Item>,
        project: Project,
    ) -> Result<Self, ViewError> {
        let items: Vec<Item> = items.into_iter().collect();
        if !items.is_empty() {
            let root = Project::common_root(items.iter().map(Item::project));
            if !project.contains(&root) {
                return Err(ViewError::ForeignItem {
                    root,
                    anchor: project,
                });
            }
        }
        Ok(Self { items, project })
    }

    /// Build a view without the containment check. The anchor is the null
    /// project, which contains everything — the top-level unfiltered pull.
    #[must_use]
    pub fn unfiltered(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            items: items.into_iter().collect(),
            project: Project::null(),
        }
    }

    /// Internal constructor for item sets already filtered by containment
    /// against `project` (or a subset of a valid view).
    pub(crate) fn from_filtered(items: impl IntoIterator<Item = Item>, project: Project) -> Self {
        Self {
            items: items.into_iter().collect(),
            project,
        }
    }

    #[must_use]
    pub const fn project(&self) -> &Project {
        &self.project
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, item: &Item) -> bool {
        self.items.contains(item)
    }

    fn narrow(&self, keep: impl Fn(&Item) -> bool) -> Self {
        Self {
            items: self.items.iter().filter(|item| keep(item)).cloned().collect(),
            project: self.project.clone(),
        }
    }

    /// Items not yet archived.
    #[must_use]
    pub fn active(&self) -> Self {
        self.narrow(|item| !item.archived())
    }

    #[must_use]
    pub fn archived(&self) -> Self {
        self.narrow(Item::archived)
    }

    #[must_use]
    pub fn completed(&self) -> Self {
        self.narrow(Item::completed)
    }

    #[must_use]
    pub fn incomplete(&self) -> Self {
        self.narrow(|item| !item.completed())
    }

    #[must_use]
    pub fn recurring(&self) -> Self {
        self.narrow(Item::recurring)
    }

    #[must_use]
    pub fn onetime(&self) -> Self {
        self.narrow(|item| !item.recurring())
    }

    /// Items whose project equals the anchor exactly, descendants excluded.
    #[must_use]
    pub fn current_project(&self) -> Self {
        self.narrow(|item| item.project() == &self.project)
    }

    /// Split into one child view per subproject one segment deeper than
    /// the anchor.
    ///
    /// Items sitting directly on the anchor come first as their own view;
    /// e.g. anchored at `grocery` with items under `grocery`,
    /// `grocery.produce`, `grocery.produce.fruit`, and `grocery.dairy`,
    /// the groups are `grocery` (exact), `grocery.produce`, `grocery.dairy`.
    #[must_use]
    pub fn subproject_views(&self) -> Vec<Self> {
        let child_depth = self.project.depth() + 1;
        let mut subprojects: Vec<Project> = Vec::new();
        for item in &self.items {
            let truncated = item.project().truncate(child_depth);
            if !subprojects.contains(&truncated) {
                subprojects.push(truncated);
            }
        }

        let mut views = Vec::new();
        if let Some(pos) = subprojects.iter().position(|p| p == &self.project) {
            subprojects.remove(pos);
            views.push(self.current_project());
        }
        for subproject in subprojects {
            let items = self
                .items
                .iter()
                .filter(|item| subproject.contains(item.project()))
                .cloned()
                .collect::<Vec<_>>();
            views.push(Self::from_filtered(items, subproject));
        }
        views
    }
}

impl<'a> IntoIterator for &'a View {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
