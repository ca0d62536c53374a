use crate::sim::Module;
use fabric_core::{Delivery, DispatchError, Gate, Message, Packet};
use std::any::Any;

/// A stand-in for a protocol layer that records everything it receives.
///
/// Captures never respond. Messages are sent on their behalf with
/// [`Sim::send`](crate::Sim::send).
#[derive(Debug, Clone, Default)]
pub struct Capture {
    name: String,
    received: Vec<(Gate, Message)>,
}

impl Capture {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            received: vec![],
        }
    }

    /// Every message received so far with the gate it arrived on.
    pub fn received(&self) -> &[(Gate, Message)] {
        &self.received
    }

    /// The data packets received so far.
    pub fn packets(&self) -> impl Iterator<Item = &Packet> {
        self.received.iter().filter_map(|(_, message)| match message {
            Message::Data(packet) => Some(packet),
            _ => None,
        })
    }

    /// The number of registration commands received so far.
    pub fn registrations(&self) -> usize {
        self.received
            .iter()
            .filter(|(_, message)| {
                matches!(
                    message,
                    Message::RegisterProtocol(_) | Message::RegisterInterface(_)
                )
            })
            .count()
    }
}

impl Module for Capture {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&mut self, arrival: Gate, message: Message) -> Result<Vec<Delivery>, DispatchError> {
        tracing::trace!(capture = %self.name, %arrival, name = message.name(), "captured");
        self.received.push((arrival, message));
        Ok(vec![])
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
