//! keeper-broadcast: reactive fan-out of list changes.
//!
//! A *channel* is an anchor project plus a renderer; observers subscribe
//! to channels and receive a freshly rendered snapshot whenever the
//! registry changes anywhere under an anchor they watch. Updates flow
//! upward: a mutation under `grocery.produce` reaches channels anchored at
//! `grocery.produce`, `grocery`, and the root — never channels anchored
//! deeper.

pub mod broadcaster;
pub mod channel;
pub mod observer;

pub use broadcaster::{BroadcastError, Broadcaster};
pub use channel::{ChannelId, Renderer};
pub use observer::{Observer, ObserverGone};
