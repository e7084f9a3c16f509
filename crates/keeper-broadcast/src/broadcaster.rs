//! Fan-out of registry changes to subscribed observers.

use std::collections::HashMap;
use std::sync::Arc;

use keeper_core::model::{Item, Project};
use keeper_core::registry::Registry;
use thiserror::Error;

use crate::channel::{Channel, ChannelId, Renderer};
use crate::observer::Observer;

/// Failure modes of explicit channel operations.
///
/// Transport failures are deliberately absent: a dead connection during a
/// broadcast is logged and pruned, never surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    #[error("no channel registered for {0}")]
    UnknownChannel(ChannelId),
}

/// Maps channels to observer sets and pushes fresh renders on change.
///
/// The registry is passed in per call; the broadcaster holds no item state
/// of its own and expects the caller to serialize registry mutation.
#[derive(Default)]
pub struct Broadcaster {
    channels: HashMap<ChannelId, Channel>,
}

impl Broadcaster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a channel exists for `(project, renderer)`.
    ///
    /// Idempotent: registering the same pair again is a no-op, because
    /// concurrent first-touch registrations are expected under competing
    /// subscriptions.
    pub fn register(&mut self, project: Project, renderer: Arc<dyn Renderer>) -> ChannelId {
        let id = ChannelId::new(project.clone(), renderer.key());
        self.channels
            .entry(id.clone())
            .or_insert_with(|| Channel::new(project, renderer));
        id
    }

    /// Add an observer to the channel for `(project, renderer)`, creating
    /// the channel on first touch. Returns the channel identity the caller
    /// uses for [`Self::send_update`].
    pub fn subscribe(
        &mut self,
        observer: Arc<dyn Observer>,
        project: Project,
        renderer: Arc<dyn Renderer>,
    ) -> ChannelId {
        let id = self.register(project, renderer);
        if let Some(channel) = self.channels.get_mut(&id) {
            channel.observers.push(observer);
        }
        id
    }

    /// Number of live observers on a channel. Zero for unknown channels.
    #[must_use]
    pub fn observer_count(&self, id: &ChannelId) -> usize {
        self.channels.get(id).map_or(0, |c| c.observers.len())
    }

    /// Render a channel's current item set: the registry's active items
    /// whose project is contained by the channel anchor.
    ///
    /// # Errors
    ///
    /// [`BroadcastError::UnknownChannel`] if `id` was never registered.
    pub fn render_channel(
        &self,
        reg: &Registry,
        id: &ChannelId,
    ) -> Result<String, BroadcastError> {
        let channel = self
            .channels
            .get(id)
            .ok_or_else(|| BroadcastError::UnknownChannel(id.clone()))?;
        Ok(render(channel, reg))
    }

    /// Push a fresh render of `id` to a single observer — the first paint
    /// right after subscribing. A send failure is logged and left for the
    /// next broadcast's pruning pass.
    ///
    /// # Errors
    ///
    /// [`BroadcastError::UnknownChannel`] if `id` was never registered.
    pub fn send_update(
        &self,
        reg: &Registry,
        observer: &Arc<dyn Observer>,
        id: &ChannelId,
    ) -> Result<(), BroadcastError> {
        let text = self.render_channel(reg, id)?;
        if observer.send(&text).is_err() {
            tracing::warn!(channel = %id, "dropping update: observer connection closed");
        }
        Ok(())
    }

    /// Notify every channel affected by a mutation under `affected`.
    ///
    /// Dead observers are pruned first (synchronously — there is no
    /// background sweep). Then each channel whose anchor contains
    /// `affected` is rendered exactly once, no matter how many observers
    /// share it, and the text is pushed to all of them. Individual send
    /// failures never abort the loop.
    pub fn broadcast_update(&mut self, reg: &Registry, affected: &Project) {
        self.prune_disconnected();

        for (id, channel) in &self.channels {
            if !channel.wants_update(affected) {
                continue;
            }
            let text = render(channel, reg);
            for observer in &channel.observers {
                if observer.send(&text).is_err() {
                    tracing::warn!(
                        channel = %id,
                        "send failed during broadcast; observer will be pruned"
                    );
                }
            }
        }
    }

    /// Remove an observer from every channel it is registered under.
    pub fn disconnect(&mut self, observer: &Arc<dyn Observer>) {
        for channel in self.channels.values_mut() {
            channel.observers.retain(|o| !Arc::ptr_eq(o, observer));
        }
    }

    fn prune_disconnected(&mut self) {
        for channel in self.channels.values_mut() {
            channel.observers.retain(|o| o.is_connected());
        }
    }
}

fn render(channel: &Channel, reg: &Registry) -> String {
    let items: Vec<Item> = reg
        .items()
        .into_iter()
        .filter(|item| channel.covers_item(item))
        .cloned()
        .collect();
    channel.renderer.render(&channel.project, &items)
}
