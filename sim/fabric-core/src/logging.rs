//! Wrapper functions for the events a dispatcher emits.
//!
//! Each function corresponds to one kind of event so that every dispatcher
//! reports it with the same fields.

use crate::dispatcher::DispatchError;
use std::fmt::Display;
use tracing::{event, Level};

/// A binding was created or overwritten.
pub(crate) fn binding_event(
    dispatcher: &'static str,
    key: impl Display,
    gate: impl Display,
    previous: Option<usize>,
) {
    match previous {
        Some(previous) => event!(
            Level::INFO,
            dispatcher,
            key = %key,
            gate = %gate,
            previous,
            "binding overwritten"
        ),
        None => event!(Level::INFO, dispatcher, key = %key, gate = %gate, "binding created"),
    }
}

/// A message was forwarded through a single gate. `control` names the
/// control info the destination was chosen from.
pub(crate) fn forward_event(
    dispatcher: &'static str,
    name: &str,
    control: &str,
    gate: impl Display,
) {
    event!(Level::DEBUG, dispatcher, name, control, gate = %gate, "forwarded");
}

/// A registration was duplicated to every gate of one side.
pub(crate) fn broadcast_event(dispatcher: &'static str, name: &str, side: &str, count: usize) {
    event!(Level::DEBUG, dispatcher, name, side, count, "broadcast");
}

/// A message could not be dispatched.
pub(crate) fn rejected_event(dispatcher: &'static str, error: &DispatchError) {
    event!(Level::WARN, dispatcher, error = %error, "rejected");
}
