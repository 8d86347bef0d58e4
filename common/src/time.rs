//! The process-wide timer tick source (§5: "All timers are ticked by a
//! single tick source; tick resolution is 1 ms. A timer's callback runs on
//! the executor that created it.").
//!
//! `TickSource` owns the wall-clock side of that contract: it fires once a
//! millisecond and fans the tick out to every executor that subscribed. Each
//! executor is free to derive coarser timers (guard timers, retry backoffs)
//! from the ticks it receives; `TickSource` itself knows nothing about what
//! a tick means to a subscriber.

use async_channel::{Receiver, Sender};
use std::time::Duration;
use stop_token::StopToken;

pub const TICK_RESOLUTION: Duration = Duration::from_millis(1);

#[derive(Clone, Default)]
pub struct TickSource {
    subscribers: std::sync::Arc<async_std::sync::Mutex<Vec<Sender<()>>>>,
}

impl TickSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe an executor to the 1ms tick stream.
    pub async fn subscribe(&self) -> Receiver<()> {
        let (tx, rx) = async_channel::bounded(1);
        self.subscribers.lock().await.push(tx);
        rx
    }

    /// Drive the tick source until `stop` fires. Intended to be spawned once
    /// per process.
    pub async fn run(self, stop: StopToken) {
        enum Event {
            Tick,
            Stopped,
        }
        let mut interval = async_io::Timer::interval(TICK_RESOLUTION);
        loop {
            let stop_clone = stop.clone();
            let event = futures_lite::future::or(
                async {
                    futures_lite::StreamExt::next(&mut interval).await;
                    Event::Tick
                },
                async {
                    stop_clone.await;
                    Event::Stopped
                },
            )
            .await;
            match event {
                Event::Stopped => break,
                Event::Tick => {
                    let subs = self.subscribers.lock().await;
                    for sub in subs.iter() {
                        // Ticks are lossy by design: a busy subscriber simply skips a tick.
                        let _ = sub.try_send(());
                    }
                }
            }
        }
    }
}

/// A monotonically increasing slot counter, used by the MAC/scheduler layer
/// instead of wall-clock time so that tests can drive slot indications
/// deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SlotPoint(pub u64);

impl SlotPoint {
    pub fn new(value: u64) -> Self {
        SlotPoint(value)
    }

    pub fn saturating_sub(self, other: SlotPoint) -> u64 {
        self.0.saturating_sub(other.0)
    }
}

impl std::ops::Add<u64> for SlotPoint {
    type Output = SlotPoint;
    fn add(self, rhs: u64) -> SlotPoint {
        SlotPoint(self.0 + rhs)
    }
}

impl std::ops::Sub for SlotPoint {
    type Output = i64;
    fn sub(self, rhs: SlotPoint) -> i64 {
        self.0 as i64 - rhs.0 as i64
    }
}
