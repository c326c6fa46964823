//! # Bus Transport
//!
//! The seam between the session and the physical bus. [`BusTransport`] takes
//! `&self` so the poll ticker and the receive loop can share one handle; the
//! SocketCAN implementation wraps a non-blocking socket and is safe for
//! concurrent send/receive.
//!
//! Opening the interface can fail (device absent, permission denied, wrong
//! bit-rate setup). That is not fatal to the process: the session falls back
//! to [`SocketCanTransport::disabled`], where every operation reports
//! `NotConnected`.

use crate::can::frame::CanBusFrame;
use crate::can::lock;
use crate::constants::SOCKET_POLL_INTERVAL;
use crate::error::CanBusError;
use crate::logging::log_debug;
use async_trait::async_trait;
use socketcan::{CanSocket, EmbeddedFrame, Frame, Socket, StandardId};
use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Operations on the shared half-duplex bus handle.
#[async_trait]
pub trait BusTransport: Send + Sync {
    /// Transmits exactly one frame. No implicit retry.
    async fn send(&self, frame: &CanBusFrame) -> Result<(), CanBusError>;

    /// Blocks up to `timeout` for one inbound frame. `Ok(None)` means the
    /// timeout elapsed, which is not an error. Bounded CPU use; safe to call
    /// in a tight loop.
    async fn recv(&self, timeout: Duration) -> Result<Option<CanBusFrame>, CanBusError>;

    /// Releases the underlying handle. Idempotent; later sends and receives
    /// report `NotConnected`.
    fn close(&self);
}

/// SocketCAN transport over a named Linux interface (e.g. `can0`).
pub struct SocketCanTransport {
    socket: Mutex<Option<CanSocket>>,
}

impl SocketCanTransport {
    /// Opens the interface in non-blocking mode.
    pub fn open(interface: &str) -> Result<SocketCanTransport, CanBusError> {
        let socket = CanSocket::open(interface)
            .map_err(|e| CanBusError::TransportUnavailable(format!("{interface}: {e}")))?;
        socket
            .set_nonblocking(true)
            .map_err(|e| CanBusError::TransportUnavailable(format!("{interface}: {e}")))?;
        Ok(SocketCanTransport {
            socket: Mutex::new(Some(socket)),
        })
    }

    /// The degraded no-op state used when the interface could not be opened.
    pub fn disabled() -> SocketCanTransport {
        SocketCanTransport {
            socket: Mutex::new(None),
        }
    }
}

#[async_trait]
impl BusTransport for SocketCanTransport {
    async fn send(&self, frame: &CanBusFrame) -> Result<(), CanBusError> {
        let guard = lock(&self.socket);
        let socket = guard.as_ref().ok_or(CanBusError::NotConnected)?;
        let id = StandardId::new(frame.id() as u16)
            .ok_or_else(|| CanBusError::Send(format!("identifier 0x{:X} out of range", frame.id())))?;
        let raw = socketcan::CanFrame::new(id, frame.data())
            .ok_or_else(|| CanBusError::Send("payload exceeds 8 bytes".into()))?;
        socket
            .write_frame(&raw)
            .map_err(|e| CanBusError::Send(e.to_string()))
    }

    async fn recv(&self, timeout: Duration) -> Result<Option<CanBusFrame>, CanBusError> {
        let deadline = Instant::now() + timeout;
        loop {
            {
                let guard = lock(&self.socket);
                let socket = guard.as_ref().ok_or(CanBusError::NotConnected)?;
                match socket.read_frame() {
                    Ok(socketcan::CanFrame::Data(inner)) => {
                        if inner.is_extended() {
                            log_debug(&format!(
                                "ignoring extended-id frame 0x{:X}",
                                inner.raw_id()
                            ));
                        } else {
                            let frame =
                                CanBusFrame::new(inner.raw_id(), inner.data().to_vec())?;
                            return Ok(Some(frame));
                        }
                    }
                    Ok(socketcan::CanFrame::Remote(_)) => {
                        // Remote frames carry no sensor data; keep waiting.
                    }
                    Ok(socketcan::CanFrame::Error(e)) => {
                        return Err(CanBusError::Receive(format!("error frame: {e:?}")));
                    }
                    Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
                    Err(e) => return Err(CanBusError::Receive(e.to_string())),
                }
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(SOCKET_POLL_INTERVAL).await;
        }
    }

    fn close(&self) {
        // Dropping the socket releases it; taking the Option makes a second
        // close a no-op.
        lock(&self.socket).take();
    }
}
