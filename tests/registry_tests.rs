//! Unit tests for the observer registry: ordering, fault isolation, and
//! the zero-observer case.

use canbus_rs::{CanBusError, DecodedReading, ObserverRegistry};
use std::sync::{Arc, Mutex};

fn wind(rpm: u8) -> DecodedReading {
    DecodedReading::WindSpeed { rpm }
}

/// Tests that sinks run in registration order.
#[test]
fn test_sinks_run_in_registration_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let mut registry = ObserverRegistry::new();

    for tag in ["first", "second", "third"] {
        let order = order.clone();
        registry.register(
            0x09,
            Box::new(move |_: &DecodedReading| -> Result<(), CanBusError> {
                order.lock().unwrap().push(tag);
                Ok(())
            }),
        );
    }

    registry.dispatch(0x09, &wind(1));
    assert_eq!(*order.lock().unwrap(), ["first", "second", "third"]);
}

/// Tests that a failing sink does not block the sinks after it.
#[test]
fn test_failing_sink_is_isolated() {
    let reached = Arc::new(Mutex::new(0u32));
    let mut registry = ObserverRegistry::new();

    registry.register(
        0x09,
        Box::new(|_: &DecodedReading| -> Result<(), CanBusError> {
            Err(CanBusError::Sink("display detached".into()))
        }),
    );
    let reached_clone = reached.clone();
    registry.register(
        0x09,
        Box::new(move |_: &DecodedReading| -> Result<(), CanBusError> {
            *reached_clone.lock().unwrap() += 1;
            Ok(())
        }),
    );

    registry.dispatch(0x09, &wind(2));
    registry.dispatch(0x09, &wind(3));
    assert_eq!(*reached.lock().unwrap(), 2);
}

/// Tests that dispatching with no registered sinks is a silent drop.
#[test]
fn test_dispatch_without_sinks_drops_reading() {
    let mut registry = ObserverRegistry::new();
    registry.dispatch(0x08, &wind(4));
    assert_eq!(registry.sink_count(0x08), 0);
}

/// Tests that sinks only see readings for their own identifier.
#[test]
fn test_dispatch_is_keyed_by_identifier() {
    let hits = Arc::new(Mutex::new(0u32));
    let mut registry = ObserverRegistry::new();

    let hits_clone = hits.clone();
    registry.register(
        0x08,
        Box::new(move |_: &DecodedReading| -> Result<(), CanBusError> {
            *hits_clone.lock().unwrap() += 1;
            Ok(())
        }),
    );

    registry.dispatch(0x09, &wind(5));
    assert_eq!(*hits.lock().unwrap(), 0);
    registry.dispatch(0x08, &wind(6));
    assert_eq!(*hits.lock().unwrap(), 1);
}
