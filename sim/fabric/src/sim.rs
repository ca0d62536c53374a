//! A minimal message scheduler for wiring dispatchers and layers together.
//!
//! A [`Sim`] owns a set of [`Module`]s and the wires between their gates.
//! Messages are delivered strictly in the order they were sent, and each
//! one is handled to completion before the next. The first failure stops
//! the run.
//!
//! Every gate a dispatcher is created with must be wired. Registrations are
//! copied to every gate of the opposite side, and a copy sent out of an
//! unwired gate stops the run with [`SimError::Unwired`].

use fabric_core::{
    dispatcher::boundary::Boundary, Delivery, DispatchError, Dispatcher, Gate, Message,
    RegistryError,
};
use rustc_hash::FxHashMap;
use std::{any::Any, collections::VecDeque};
use thiserror::Error as ThisError;

/// An index identifying a module within a [`Sim`].
pub type ModuleId = usize;

/// Anything a [`Sim`] can deliver messages to.
pub trait Module: Any {
    fn name(&self) -> &str;

    /// Handles a message that arrived on `arrival` and returns the messages
    /// to send in response.
    fn handle(&mut self, arrival: Gate, message: Message) -> Result<Vec<Delivery>, DispatchError>;

    fn as_any(&self) -> &dyn Any;
}

impl<B: Boundary + 'static> Module for Dispatcher<B> {
    fn name(&self) -> &str {
        Dispatcher::name(self)
    }

    fn handle(&mut self, arrival: Gate, message: Message) -> Result<Vec<Delivery>, DispatchError> {
        Dispatcher::handle(self, arrival, message)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A message waiting to be handled.
#[derive(Debug)]
struct Event {
    module: ModuleId,
    arrival: Gate,
    message: Message,
}

/// Owns modules and delivers messages between them.
#[derive(Default)]
pub struct Sim {
    modules: Vec<Box<dyn Module>>,
    /// Maps an output gate of a module to the input gate it is wired to.
    wires: FxHashMap<(ModuleId, Gate), (ModuleId, Gate)>,
    queue: VecDeque<Event>,
}

impl Sim {
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a module and returns its id.
    pub fn add(&mut self, module: impl Module) -> ModuleId {
        self.modules.push(Box::new(module));
        self.modules.len() - 1
    }

    /// Wires two gates together in both directions.
    pub fn link(&mut self, a: (ModuleId, Gate), b: (ModuleId, Gate)) {
        self.wires.insert(a, b);
        self.wires.insert(b, a);
    }

    /// Sends `message` out of the given gate of a module.
    pub fn send(&mut self, from: ModuleId, gate: Gate, message: Message) -> Result<(), SimError> {
        let (module, arrival) = self.wire(from, gate)?;
        tracing::trace!(
            from = self.module_name(from),
            to = self.module_name(module),
            %arrival,
            name = message.name(),
            "queued"
        );
        self.queue.push_back(Event {
            module,
            arrival,
            message,
        });
        Ok(())
    }

    /// Handles queued messages until none are left. Returns the number of
    /// messages handled.
    ///
    /// If a module fails, the remaining messages are discarded and the
    /// error is returned.
    pub fn run(&mut self) -> Result<usize, SimError> {
        let mut handled = 0;
        while let Some(event) = self.queue.pop_front() {
            if let Err(e) = self.deliver(event) {
                self.queue.clear();
                tracing::error!("{}", e);
                return Err(e);
            }
            handled += 1;
        }
        tracing::debug!(handled, "sim idle");
        Ok(handled)
    }

    /// Gets a module by id if it has the given type.
    pub fn module<T: Module>(&self, id: ModuleId) -> Option<&T> {
        self.modules.get(id)?.as_any().downcast_ref()
    }

    /// The number of messages waiting to be handled.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn deliver(&mut self, event: Event) -> Result<(), SimError> {
        let Event {
            module,
            arrival,
            message,
        } = event;
        let target = self
            .modules
            .get_mut(module)
            .ok_or(SimError::UnknownModule(module))?;
        let deliveries = target
            .handle(arrival, message)
            .map_err(|source| SimError::Dispatch {
                module: target.name().to_owned(),
                source,
            })?;
        for Delivery { gate, message } in deliveries {
            self.send(module, gate, message)?;
        }
        Ok(())
    }

    fn wire(&self, from: ModuleId, gate: Gate) -> Result<(ModuleId, Gate), SimError> {
        self.wires
            .get(&(from, gate))
            .copied()
            .ok_or_else(|| SimError::Unwired {
                module: self.module_name(from).to_owned(),
                gate,
            })
    }

    fn module_name(&self, id: ModuleId) -> &str {
        self.modules
            .get(id)
            .map(|module| module.name())
            .unwrap_or("<unknown>")
    }
}

#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("{module} failed: {source}")]
    Dispatch {
        module: String,
        #[source]
        source: DispatchError,
    },
    #[error("Gate {gate} of {module} is not wired to anything")]
    Unwired { module: String, gate: Gate },
    #[error("No module with id {0}")]
    UnknownModule(ModuleId),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl SimError {
    /// The dispatch error that stopped the run, if any.
    pub fn dispatch_error(&self) -> Option<&DispatchError> {
        match self {
            SimError::Dispatch { source, .. } => Some(source),
            _ => None,
        }
    }
}
