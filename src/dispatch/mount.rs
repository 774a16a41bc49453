//! Mount task - runs one consumer on the shared frame stream
//!
//! Mounting a [`Consumer`] takes its creation-time snapshot from the latest
//! frame, then spawns a local task that ticks it once per new frame and
//! forwards key presses. The task is a small typestate machine:
//!
//! ```text
//! TickLoop<Mounted> ──prime()──► TickLoop<Ticking> ──run()──► (cancelled)
//! ```
//!
//! Unmounting cancels the task. Cancellation is checked before every frame,
//! so a torn-down consumer never ticks again.

use statum::{machine, state};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::controller::poller::Frame;
use crate::dispatch::consumer::Consumer;
use crate::dispatch::keys::{KeyChannel, KeyPress};

#[state]
#[derive(Debug, Clone)]
pub enum TickState {
    Mounted,
    Ticking,
}

#[machine]
#[derive(Debug)]
pub struct TickLoop<S: TickState> {
    consumer: Consumer,

    // Latest polled frame
    frames: watch::Receiver<Frame>,

    // Discrete key presses from the alternate channel
    keys: broadcast::Receiver<KeyPress>,

    cancel: CancellationToken,
}

impl TickLoop<Mounted> {
    pub fn create(
        consumer: Consumer,
        frames: watch::Receiver<Frame>,
        keys: broadcast::Receiver<KeyPress>,
        cancel: CancellationToken,
    ) -> Self {
        Self::new(consumer, frames, keys, cancel)
    }

    /// Takes the creation-time snapshot and moves to `Ticking`.
    ///
    /// Before the poller has published its first frame there is nothing to
    /// snapshot; the consumer then primes itself on its first real tick.
    pub fn prime(mut self) -> TickLoop<Ticking> {
        let frame = self.frames.borrow_and_update().clone();
        if frame.seq == 0 {
            debug!(
                "[{}] no frame polled yet, priming on first tick",
                self.consumer.label()
            );
        } else {
            self.consumer.prime(&frame.devices);
            debug!(
                "[{}] primed on frame {}",
                self.consumer.label(),
                frame.seq
            );
        }
        self.transition()
    }
}

impl TickLoop<Ticking> {
    pub async fn run(mut self) {
        let mut keys_open = true;
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                changed = self.frames.changed() => {
                    if changed.is_err() {
                        info!("[{}] frame source closed", self.consumer.label());
                        break;
                    }
                    let frame = self.frames.borrow_and_update().clone();
                    self.consumer.tick(frame.at, &frame.devices);
                }
                press = self.keys.recv(), if keys_open => match press {
                    Ok(press) => {
                        self.consumer.on_key(&press);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("[{}] dropped {} key presses", self.consumer.label(), skipped);
                    }
                    Err(RecvError::Closed) => keys_open = false,
                },
            }
        }
        debug!("[{}] tick loop finished", self.consumer.label());
    }
}

/// Keeps a consumer mounted. Dropping it unmounts.
#[derive(Debug)]
pub struct MountHandle {
    label: String,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl MountHandle {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_mounted(&self) -> bool {
        !self.cancel.is_cancelled() && !self.task.is_finished()
    }

    /// Stops scheduling further ticks for this consumer
    pub fn unmount(self) {}
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        if !self.cancel.is_cancelled() {
            self.cancel.cancel();
            info!("Unmounted consumer {}", self.label);
        }
    }
}

/// Shared entry point for mounting consumers on one frame stream.
///
/// Cheap to clone; handlers may hold a clone to mount overlays on demand.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    frames: watch::Receiver<Frame>,
    keys: KeyChannel,
}

impl Dispatcher {
    pub fn new(frames: watch::Receiver<Frame>, keys: KeyChannel) -> Self {
        Self { frames, keys }
    }

    pub fn keys(&self) -> &KeyChannel {
        &self.keys
    }

    /// Primes `consumer` against the latest frame and spawns its tick loop
    /// on the current `LocalSet`
    pub fn mount(&self, consumer: Consumer) -> MountHandle {
        let label = consumer.label().to_string();
        let cancel = CancellationToken::new();

        let ticking = TickLoop::create(
            consumer,
            self.frames.clone(),
            self.keys.subscribe(),
            cancel.clone(),
        )
        .prime();
        let task = tokio::task::spawn_local(ticking.run());
        info!("Mounted consumer {}", label);

        MountHandle {
            label,
            cancel,
            task,
        }
    }
}
