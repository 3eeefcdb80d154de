//! Per-room auto-draw timer.
//!
//! [`DrawScheduler`] drives a room's automatic draws at a fixed interval.
//! It is designed to sit inside the room actor's `tokio::select!` loop,
//! next to the command channel:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = receiver.recv() => { /* handle commands */ }
//!         _ = scheduler.wait_for_draw() => {
//!             // perform one draw; disarm on finish/exhaustion
//!         }
//!     }
//! }
//! ```
//!
//! The scheduler fires only while **armed**. `start` arms it for rooms
//! with auto-draw enabled; the actor disarms it the moment it observes
//! the room leaving the running phase, the pool running dry, or the
//! persistence collaborator failing. Disarmed, [`wait_for_draw`]
//! pends forever, so the `select!` keeps serving commands and the loop
//! winds down with the actor instead of escaping through an error.
//!
//! [`wait_for_draw`]: DrawScheduler::wait_for_draw

use std::time::Duration;

use rand::Rng;
use tokio::time::{self, Instant};
use tracing::{debug, warn};

/// Maximum random delay added to the first draw after arming, so many
/// rooms started in the same instant don't all draw in lockstep.
const MAX_INITIAL_JITTER: Duration = Duration::from_millis(250);

/// Fixed-interval draw timer for a single room.
///
/// One `DrawScheduler` per room actor. Not shared, not locked: the
/// owning actor is the only caller.
#[derive(Debug)]
pub struct DrawScheduler {
    interval: Duration,
    /// When the next draw should fire. `None` = disarmed.
    next_draw: Option<Instant>,
    fired: u64,
}

impl DrawScheduler {
    /// Creates a disarmed scheduler that will fire every `interval`
    /// once armed.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_draw: None,
            fired: 0,
        }
    }

    /// Arms the timer. The first draw fires one interval from now, plus
    /// a small random jitter. Idempotent: arming an armed scheduler
    /// keeps its existing deadline.
    pub fn arm(&mut self) {
        if self.next_draw.is_some() {
            return;
        }
        let jitter_cap = MAX_INITIAL_JITTER.min(self.interval / 10).as_micros() as u64;
        let jitter = if jitter_cap > 0 {
            Duration::from_micros(rand::rng().random_range(0..jitter_cap))
        } else {
            Duration::ZERO
        };
        self.next_draw = Some(Instant::now() + self.interval + jitter);
        debug!(interval_secs = self.interval.as_secs_f64(), "auto-draw armed");
    }

    /// Disarms the timer. Idempotent. [`wait_for_draw`] pends forever
    /// until the next [`arm`].
    ///
    /// [`wait_for_draw`]: Self::wait_for_draw
    /// [`arm`]: Self::arm
    pub fn disarm(&mut self) {
        if self.next_draw.take().is_some() {
            debug!(fired = self.fired, "auto-draw disarmed");
        }
    }

    /// Whether the timer is currently armed.
    pub fn is_armed(&self) -> bool {
        self.next_draw.is_some()
    }

    /// Waits until the next draw is due and returns the total number of
    /// draws fired so far (this one included).
    ///
    /// While disarmed this future pends forever. It never resolves on
    /// its own, but a surrounding `tokio::select!` still processes its
    /// other branches.
    pub async fn wait_for_draw(&mut self) -> u64 {
        let Some(next) = self.next_draw else {
            std::future::pending::<()>().await;
            unreachable!()
        };

        time::sleep_until(next).await;

        let now = Instant::now();
        self.fired += 1;

        // A late wakeup (busy actor, slow store) reschedules from now;
        // no catch-up burst of draws.
        let late_by = now.saturating_duration_since(next);
        if late_by > self.interval / 10 {
            warn!(
                draw = self.fired,
                late_ms = late_by.as_secs_f64() * 1000.0,
                "auto-draw fired late, rescheduling from now"
            );
        }
        self.next_draw = Some(now + self.interval);

        self.fired
    }

    /// Total draws fired since creation.
    pub fn draws_fired(&self) -> u64 {
        self.fired
    }

    /// The configured draw interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}
