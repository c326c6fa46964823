//! CAN bus core: the frame value type, the pure sensor codec, the transport
//! seam (SocketCAN plus a mock twin for tests), the observer registry, and
//! the polling session that ties them together.

pub mod codec;
pub mod frame;
pub mod orientation;
pub mod registry;
pub mod session;
pub mod transport;
pub mod transport_mock;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a mutex, recovering the guard if a panicking holder poisoned it.
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
