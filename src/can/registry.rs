//! # Observer Registry
//!
//! Maps frame identifiers to the sinks interested in them, decoupling
//! decode/dispatch from consumers. Sinks are called in registration order;
//! a failing sink is logged and never blocks the others or the receive path.

use crate::can::codec::DecodedReading;
use crate::error::CanBusError;
use crate::logging::{log_debug, log_warn};
use std::collections::HashMap;

/// An external consumer of decoded readings (a display, a derived-state
/// updater, a recorder in tests).
pub trait ReadingSink: Send {
    fn on_reading(&mut self, reading: &DecodedReading) -> Result<(), CanBusError>;
}

/// Any `FnMut` closure over a reading works as a sink.
impl<F> ReadingSink for F
where
    F: FnMut(&DecodedReading) -> Result<(), CanBusError> + Send,
{
    fn on_reading(&mut self, reading: &DecodedReading) -> Result<(), CanBusError> {
        (self)(reading)
    }
}

/// Registry of sinks keyed by frame identifier.
#[derive(Default)]
pub struct ObserverRegistry {
    sinks: HashMap<u32, Vec<Box<dyn ReadingSink>>>,
}

impl ObserverRegistry {
    pub fn new() -> ObserverRegistry {
        ObserverRegistry::default()
    }

    /// Registers a sink for an identifier, after any already registered.
    pub fn register(&mut self, id: u32, sink: Box<dyn ReadingSink>) {
        self.sinks.entry(id).or_default().push(sink);
    }

    /// Number of sinks registered for an identifier.
    pub fn sink_count(&self, id: u32) -> usize {
        self.sinks.get(&id).map_or(0, Vec::len)
    }

    /// Calls every sink registered for `id`, in registration order. A sink
    /// failure is logged and isolated; with no sinks the reading is dropped.
    pub fn dispatch(&mut self, id: u32, reading: &DecodedReading) {
        match self.sinks.get_mut(&id) {
            Some(sinks) => {
                for sink in sinks {
                    if let Err(e) = sink.on_reading(reading) {
                        log_warn(&format!("sink failed for id 0x{id:02X}: {e}"));
                    }
                }
            }
            None => log_debug(&format!("no sink for id 0x{id:02X}, reading dropped")),
        }
    }
}
