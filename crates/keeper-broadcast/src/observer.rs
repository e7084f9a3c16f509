//! The transport side of a subscription.

use thiserror::Error;

/// Returned by [`Observer::send`] when the connection is gone.
///
/// The broadcaster treats this the same as a negative liveness answer:
/// the observer is logged, dropped on the next pruning pass, and the
/// failure never reaches the command caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("observer connection is closed")]
pub struct ObserverGone;

/// A live connection that rendered updates are pushed to.
///
/// Implemented by the transport layer (e.g. a websocket wrapper). The
/// broadcaster only ever sends text and asks whether the connection is
/// still alive; accept/close belong to the transport.
pub trait Observer {
    /// Push rendered text to the connection.
    ///
    /// # Errors
    ///
    /// [`ObserverGone`] if the connection has closed.
    fn send(&self, text: &str) -> Result<(), ObserverGone>;

    /// Liveness query used during pruning.
    fn is_connected(&self) -> bool;
}
