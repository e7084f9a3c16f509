//! Channels: the unit of subscription.
//!
//! A channel binds an anchor [`Project`] to a [`Renderer`]; its identity is
//! the pair (anchor, renderer key). Rust closures have no dependable
//! identity, so a renderer names itself through [`Renderer::key`] — the key
//! doubles as the channel's wire name.

use std::fmt;
use std::sync::Arc;

use keeper_core::model::{Item, Project};

use crate::observer::Observer;

/// Turns a filtered item snapshot into the text pushed to observers.
///
/// Pure with respect to the broadcaster: same project and items, same
/// output. Supplied by the presentation layer, invoked only by the
/// broadcaster.
pub trait Renderer {
    /// Stable identity of this renderer; half of the channel identity.
    fn key(&self) -> &str;

    /// Render the items living under `project`.
    fn render(&self, project: &Project, items: &[Item]) -> String;
}

/// Identity of a channel: anchor project + renderer key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelId {
    project: Project,
    renderer_key: String,
}

impl ChannelId {
    pub(crate) fn new(project: Project, renderer_key: impl Into<String>) -> Self {
        Self {
            project,
            renderer_key: renderer_key.into(),
        }
    }

    #[must_use]
    pub const fn project(&self) -> &Project {
        &self.project
    }

    #[must_use]
    pub fn renderer_key(&self) -> &str {
        &self.renderer_key
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.renderer_key, self.project)
    }
}

/// A registered channel and its live observers.
pub(crate) struct Channel {
    pub(crate) project: Project,
    pub(crate) renderer: Arc<dyn Renderer>,
    pub(crate) observers: Vec<Arc<dyn Observer>>,
}

impl Channel {
    pub(crate) fn new(project: Project, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            project,
            renderer,
            observers: Vec::new(),
        }
    }

    /// Whether this channel wants updates about a mutation under
    /// `affected`: true iff the channel anchor contains it. Ancestor and
    /// self channels hear about a child change; descendant channels do
    /// not.
    pub(crate) fn wants_update(&self, affected: &Project) -> bool {
        self.project.contains(affected)
    }

    /// Whether an item belongs in this channel's rendering.
    pub(crate) fn covers_item(&self, item: &Item) -> bool {
        self.project.contains(item.project())
    }
}
