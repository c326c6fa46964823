//! # Channel Session Manager
//!
//! [`BusSession`] multiplexes the three virtual sensor channels over one
//! shared half-duplex bus. It owns the transport and three background tasks:
//!
//! - a **receive loop** draining the transport with a bounded timeout and
//!   decoding inbound frames onto a queue,
//! - a **dispatcher** consuming that queue and invoking registered sinks
//!   (explicit message passing instead of any thread-affinity assumption),
//! - at most one **poll ticker**, re-spawned by [`BusSession::activate`],
//!   sending the active channel's request on a fixed cadence.
//!
//! Replies are matched by frame identifier only; there is no request
//! correlation. The one place that matters, the anemometer echo (0x03)
//! arriving after a channel switch, is governed by [`EchoPolicy`].

use crate::can::codec::{self, DecodedReading, SensorChannel};
use crate::can::frame::CanBusFrame;
use crate::can::lock;
use crate::can::registry::{ObserverRegistry, ReadingSink};
use crate::can::transport::{BusTransport, SocketCanTransport};
use crate::constants::{
    DEFAULT_ERROR_BACKOFF, DEFAULT_POLL_INTERVAL, DEFAULT_READING_QUEUE_DEPTH,
    DEFAULT_RECV_TIMEOUT,
};
use crate::error::CanBusError;
use crate::logging::{log_debug, log_error, log_info, log_warn};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Polling state of the session. At most one channel is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling(SensorChannel),
}

/// What to do with a motor-speed echo (0x03) while the anemometer channel
/// is not the active one. `Dispatch` delivers every echo to its sinks;
/// `DiscardWhenInactive` treats such an echo as stale and drops it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoPolicy {
    Dispatch,
    DiscardWhenInactive,
}

/// Tuning for a session. The defaults reproduce the deployed timing: 10 ms
/// poll cadence, 100 ms receive timeout, 100 ms backoff after a receive
/// error.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub poll_interval: Duration,
    pub recv_timeout: Duration,
    pub error_backoff: Duration,
    pub reading_queue_depth: usize,
    pub echo_policy: EchoPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            poll_interval: DEFAULT_POLL_INTERVAL,
            recv_timeout: DEFAULT_RECV_TIMEOUT,
            error_backoff: DEFAULT_ERROR_BACKOFF,
            reading_queue_depth: DEFAULT_READING_QUEUE_DEPTH,
            echo_policy: EchoPolicy::Dispatch,
        }
    }
}

/// A polling/request-response session over one shared bus handle.
pub struct BusSession {
    transport: Arc<dyn BusTransport>,
    registry: Arc<Mutex<ObserverRegistry>>,
    state: Arc<Mutex<PollState>>,
    commanded_speed: Arc<AtomicU8>,
    stop: Arc<AtomicBool>,
    config: SessionConfig,
    recv_task: Option<JoinHandle<()>>,
    dispatch_task: Option<JoinHandle<()>>,
    poll_task: Option<JoinHandle<()>>,
}

impl BusSession {
    /// Opens the named SocketCAN interface and starts a session over it.
    /// An open failure does not abort: the session degrades to a disabled
    /// transport on which every send and receive reports `NotConnected`.
    ///
    /// Must be called within a tokio runtime.
    pub fn open(interface: &str, config: SessionConfig) -> BusSession {
        let transport: Arc<dyn BusTransport> = match SocketCanTransport::open(interface) {
            Ok(t) => {
                log_info(&format!("CAN interface {interface} opened"));
                Arc::new(t)
            }
            Err(e) => {
                log_error(&format!("CAN init error: {e}; session runs disabled"));
                Arc::new(SocketCanTransport::disabled())
            }
        };
        BusSession::start(transport, config)
    }

    /// Starts a session over any transport. Tests inject a mock here.
    pub fn start(transport: Arc<dyn BusTransport>, config: SessionConfig) -> BusSession {
        let registry = Arc::new(Mutex::new(ObserverRegistry::new()));
        let state = Arc::new(Mutex::new(PollState::Idle));
        let stop = Arc::new(AtomicBool::new(false));
        let (reading_tx, reading_rx) = mpsc::channel(config.reading_queue_depth);

        let recv_task = tokio::spawn(receive_loop(
            transport.clone(),
            reading_tx,
            stop.clone(),
            config.recv_timeout,
            config.error_backoff,
        ));
        let dispatch_task = tokio::spawn(dispatch_loop(
            reading_rx,
            registry.clone(),
            state.clone(),
            config.echo_policy,
        ));

        BusSession {
            transport,
            registry,
            state,
            commanded_speed: Arc::new(AtomicU8::new(0)),
            stop,
            config,
            recv_task: Some(recv_task),
            dispatch_task: Some(dispatch_task),
            poll_task: None,
        }
    }

    /// Registers a sink for a reply identifier.
    pub fn register_sink(&self, id: u32, sink: Box<dyn ReadingSink>) {
        lock(&self.registry).register(id, sink);
    }

    /// Activates a channel: stops the previous poll ticker, if any, then
    /// starts a new one at the configured cadence. The request carries the
    /// current commanded speed on the channels that use it. Send failures
    /// are logged and never stop the ticker.
    pub fn activate(&mut self, channel: SensorChannel) {
        if let Some(ticker) = self.poll_task.take() {
            ticker.abort();
        }
        *lock(&self.state) = PollState::Polling(channel);

        let transport = self.transport.clone();
        let speed = self.commanded_speed.clone();
        let period = self.config.poll_interval;
        self.poll_task = Some(tokio::spawn(async move {
            // First poll goes out one period after activation, not at t=0.
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let frame =
                    codec::encode_poll_request(channel, speed.load(Ordering::Relaxed));
                if let Err(e) = transport.send(&frame).await {
                    log_warn(&format!("poll send failed on {channel}: {e}"));
                }
            }
        }));
        log_info(&format!("activated channel {channel}, polling every {period:?}"));
    }

    /// Returns to `Idle`, stopping the poll ticker.
    pub fn deactivate(&mut self) {
        if let Some(ticker) = self.poll_task.take() {
            ticker.abort();
        }
        *lock(&self.state) = PollState::Idle;
    }

    /// Updates the commanded motor speed embedded in later poll requests.
    /// While the anemometer channel is active this also pushes one request
    /// with the new value immediately, independent of the poll cadence.
    pub async fn set_commanded_speed(&self, value: u8) {
        self.commanded_speed.store(value, Ordering::Relaxed);
        if *lock(&self.state) == PollState::Polling(SensorChannel::Anemometer) {
            let frame = codec::encode_poll_request(SensorChannel::Anemometer, value);
            match self.transport.send(&frame).await {
                Ok(()) => log_debug(&format!("pushed commanded speed {value}")),
                Err(e) => log_warn(&format!("speed push failed: {e}")),
            }
        }
    }

    /// The commanded motor speed carried by poll requests.
    pub fn commanded_speed(&self) -> u8 {
        self.commanded_speed.load(Ordering::Relaxed)
    }

    /// The channel currently being polled, if any.
    pub fn active_channel(&self) -> Option<SensorChannel> {
        match *lock(&self.state) {
            PollState::Idle => None,
            PollState::Polling(channel) => Some(channel),
        }
    }

    /// Tears the session down: ticker stopped, receive loop joined (bounded
    /// by its receive timeout), dispatcher drained, transport closed last.
    /// Safe to call more than once.
    pub async fn shutdown(&mut self) {
        self.deactivate();
        self.stop.store(true, Ordering::SeqCst);
        if let Some(task) = self.recv_task.take() {
            let _ = task.await;
        }
        if let Some(task) = self.dispatch_task.take() {
            let _ = task.await;
        }
        self.transport.close();
        log_info("CAN session closed");
    }
}

impl Drop for BusSession {
    fn drop(&mut self) {
        // Belt for sessions dropped without shutdown(): stop the tasks so
        // they do not outlive the session.
        self.stop.store(true, Ordering::SeqCst);
        for task in [
            self.poll_task.take(),
            self.recv_task.take(),
            self.dispatch_task.take(),
        ]
        .into_iter()
        .flatten()
        {
            task.abort();
        }
    }
}

/// Background drain of the transport. Runs until the stop flag is raised;
/// a transient receive error is logged and retried after a pause, never
/// terminating the loop. Decoded readings go onto the queue; malformed or
/// unknown frames are dropped with a log line.
async fn receive_loop(
    transport: Arc<dyn BusTransport>,
    reading_tx: mpsc::Sender<(u32, DecodedReading)>,
    stop: Arc<AtomicBool>,
    recv_timeout: Duration,
    error_backoff: Duration,
) {
    while !stop.load(Ordering::SeqCst) {
        match transport.recv(recv_timeout).await {
            Ok(Some(frame)) => {
                log_debug(&format!("received frame {frame}"));
                match codec::decode(&frame) {
                    Ok(reading) => {
                        if reading_tx.send((frame.id(), reading)).await.is_err() {
                            break; // dispatcher gone, session is tearing down
                        }
                    }
                    Err(e @ CanBusError::UnknownFrameId(_)) => {
                        log_debug(&format!("discarding frame: {e}"));
                    }
                    Err(e) => log_warn(&format!("dropping frame: {e}")),
                }
            }
            Ok(None) => {}
            Err(CanBusError::NotConnected) => {
                // Disabled transport; stay quiet but keep the loop alive so
                // shutdown semantics are identical to the connected case.
                tokio::time::sleep(error_backoff).await;
            }
            Err(e) => {
                log_warn(&format!("CAN receive error: {e}"));
                tokio::time::sleep(error_backoff).await;
            }
        }
    }
}

/// Single consumer of the decoded-reading queue. Applies the echo policy,
/// then hands the reading to every sink registered for its identifier.
/// Exits when the receive loop drops its sender.
async fn dispatch_loop(
    mut reading_rx: mpsc::Receiver<(u32, DecodedReading)>,
    registry: Arc<Mutex<ObserverRegistry>>,
    state: Arc<Mutex<PollState>>,
    echo_policy: EchoPolicy,
) {
    while let Some((id, reading)) = reading_rx.recv().await {
        if echo_policy == EchoPolicy::DiscardWhenInactive
            && matches!(reading, DecodedReading::MotorSpeedEcho(_))
            && *lock(&state) != PollState::Polling(SensorChannel::Anemometer)
        {
            log_debug("discarding stale anemometer echo");
            continue;
        }
        lock(&registry).dispatch(id, &reading);
    }
}
