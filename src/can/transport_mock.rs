//! Mock transport for testing
//!
//! A scripted [`BusTransport`] so sessions can be exercised without CAN
//! hardware: queued inbound frames, recorded outbound frames, injectable
//! errors. Clones share the same buffers, letting a test keep a handle on
//! the transport it handed to the session.

use crate::can::frame::CanBusFrame;
use crate::can::lock;
use crate::can::transport::BusTransport;
use crate::error::CanBusError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Mock transport simulating a half-duplex bus endpoint.
#[derive(Clone, Default)]
pub struct MockTransport {
    /// Frames the session will receive, in order.
    rx_frames: Arc<Mutex<VecDeque<CanBusFrame>>>,
    /// Frames the session sent.
    tx_frames: Arc<Mutex<Vec<CanBusFrame>>>,
    /// Error message returned by the next `recv` call.
    next_recv_error: Arc<Mutex<Option<String>>>,
    /// Error message returned by the next `send` call.
    next_send_error: Arc<Mutex<Option<String>>>,
    /// Wakes a blocked `recv` when something is queued.
    notify: Arc<Notify>,
    closed: Arc<AtomicBool>,
    close_count: Arc<AtomicUsize>,
}

impl MockTransport {
    pub fn new() -> MockTransport {
        MockTransport::default()
    }

    /// Queues a frame for the session to receive.
    pub fn queue_frame(&self, frame: CanBusFrame) {
        lock(&self.rx_frames).push_back(frame);
        self.notify.notify_one();
    }

    /// Makes the next `recv` fail with a transient receive error.
    pub fn queue_recv_error(&self, message: &str) {
        *lock(&self.next_recv_error) = Some(message.to_string());
        self.notify.notify_one();
    }

    /// Makes the next `send` fail.
    pub fn queue_send_error(&self, message: &str) {
        *lock(&self.next_send_error) = Some(message.to_string());
    }

    /// Everything the session has sent so far.
    pub fn sent_frames(&self) -> Vec<CanBusFrame> {
        lock(&self.tx_frames).clone()
    }

    /// Forgets recorded outbound frames.
    pub fn clear_sent(&self) {
        lock(&self.tx_frames).clear();
    }

    /// How many times `close` released the transport. At most 1 by contract.
    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BusTransport for MockTransport {
    async fn send(&self, frame: &CanBusFrame) -> Result<(), CanBusError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(CanBusError::NotConnected);
        }
        if let Some(message) = lock(&self.next_send_error).take() {
            return Err(CanBusError::Send(message));
        }
        lock(&self.tx_frames).push(frame.clone());
        Ok(())
    }

    async fn recv(&self, timeout: Duration) -> Result<Option<CanBusFrame>, CanBusError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.closed.load(Ordering::SeqCst) {
                return Err(CanBusError::NotConnected);
            }
            if let Some(message) = lock(&self.next_recv_error).take() {
                return Err(CanBusError::Receive(message));
            }
            if let Some(frame) = lock(&self.rx_frames).pop_front() {
                return Ok(Some(frame));
            }
            let notified = self.notify.notified();
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                // Timed out; one last look in case of a queue/notify race.
                return Ok(lock(&self.rx_frames).pop_front());
            }
        }
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.close_count.fetch_add(1, Ordering::SeqCst);
        }
    }
}
