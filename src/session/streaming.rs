//! Stream-signal plumbing between transport and controller.
//!
//! A run's stream arrives as an in-order sequence of [`StreamSignal`]s:
//! raw event envelopes, at most one fault, and a terminal `Finished` marker.
//! Transports that deliver over a channel can use [`signal_conduit`] and feed
//! the receiving half to [`SessionController::drive`], which dispatches each
//! signal to the matching handler serially.
//!
//! [`SessionController::drive`]: super::controller::SessionController::drive

use serde_json::Value;

use super::transport::TransportFault;

/// One delivery on a run's event stream.
#[derive(Clone, Debug, PartialEq)]
pub enum StreamSignal {
    /// A raw event envelope: milestone or partial token content.
    Event(Value),
    /// The stream failed; no further events follow.
    Error(TransportFault),
    /// The stream ended normally.
    Finished,
}

/// Bounded in-order conduit for stream signals.
///
/// The transport keeps the sender; the controller drives the receiver. A
/// bounded channel applies backpressure to transports that outrun the
/// consumer; capacity 0 is coerced to the default.
///
/// # Examples
///
/// ```
/// use waypoint::session::{signal_conduit, StreamSignal};
///
/// let (tx, rx) = signal_conduit(64);
/// tx.send(StreamSignal::Finished).unwrap();
/// assert_eq!(rx.recv().unwrap(), StreamSignal::Finished);
/// ```
pub fn signal_conduit(
    capacity: usize,
) -> (flume::Sender<StreamSignal>, flume::Receiver<StreamSignal>) {
    let capacity = if capacity == 0 {
        super::config::StreamConfig::DEFAULT_BUFFER_CAPACITY
    } else {
        capacity
    };
    flume::bounded(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn conduit_preserves_delivery_order() {
        let (tx, rx) = signal_conduit(8);
        tx.send(StreamSignal::Event(json!({"retrieval": {}}))).unwrap();
        tx.send(StreamSignal::Finished).unwrap();
        drop(tx);

        let signals: Vec<StreamSignal> = rx.iter().collect();
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[1], StreamSignal::Finished);
    }

    #[test]
    fn zero_capacity_is_coerced() {
        let (tx, _rx) = signal_conduit(0);
        // A rendezvous channel would block here; the coerced bound must not.
        tx.send(StreamSignal::Finished).unwrap();
    }
}
