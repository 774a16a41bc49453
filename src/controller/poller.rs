use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::controller::device::{DeviceSnapshot, DeviceSource};

/// One polled frame, shared by every consumer ticking on it
#[derive(Clone, Debug, Default)]
pub struct Frame {
    /// Monotonic frame counter, 0 before the first poll
    pub seq: u64,
    /// Time since the poller started
    pub at: Duration,
    pub devices: Arc<Vec<Option<DeviceSnapshot>>>,
}

#[derive(Clone, Debug)]
pub struct PollerSettings {
    pub frame_interval_ms: u64,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16, // one frame at ~60 Hz
        }
    }
}

/// Handle for the frame poller task.
///
/// The poller queries its [`DeviceSource`] once per frame and publishes the
/// result on a watch channel. Late frames are skipped rather than bursted, so a
/// slow tick only ever observes a more recent snapshot.
pub struct PollerHandle {
    frames: watch::Receiver<Frame>,
    cancel: CancellationToken,
}

impl PollerHandle {
    /// Spawns the poller on the current `LocalSet`
    pub fn spawn<S>(source: S, settings: Option<PollerSettings>) -> Self
    where
        S: DeviceSource + 'static,
    {
        let settings = settings.unwrap_or_default();
        info!("Spawning frame poller with settings: {:?}", settings);

        let (sender, frames) = watch::channel(Frame::default());
        let cancel = CancellationToken::new();

        let task_cancel = cancel.clone();
        tokio::task::spawn_local(async move {
            run_poll_loop(source, sender, settings, task_cancel).await;
            info!("Frame poller stopped");
        });

        Self { frames, cancel }
    }

    pub fn subscribe(&self) -> watch::Receiver<Frame> {
        self.frames.clone()
    }

    /// Stops scheduling further frames
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_poll_loop<S: DeviceSource>(
    mut source: S,
    sender: watch::Sender<Frame>,
    settings: PollerSettings,
    cancel: CancellationToken,
) {
    let origin = Instant::now();
    let mut timer =
        tokio::time::interval(Duration::from_millis(settings.frame_interval_ms.max(1)));
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut seq = 0;
    info!(
        "Entering poll loop with {}ms frame interval",
        settings.frame_interval_ms
    );
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = timer.tick() => {
                let devices = source.poll();
                seq += 1;
                let frame = Frame {
                    seq,
                    at: origin.elapsed(),
                    devices: Arc::new(devices),
                };
                debug!("Publishing frame {} at {:?}", frame.seq, frame.at);
                sender.send_replace(frame);
            }
        }
    }
}
