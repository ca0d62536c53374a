//! A small runner for the layer-dispatch fabric.
//!
//! [`Sim`] wires dispatchers from [`fabric_core`] to stub layers
//! ([`Capture`]) and delivers messages between them in order. The
//! [`simulations`] module holds a few prebuilt setups, runnable from the
//! command line through [`cli`].

pub mod cli;

mod capture;
pub use capture::Capture;

pub mod sim;
pub use sim::{Module, ModuleId, Sim, SimError};

pub mod simulations;
