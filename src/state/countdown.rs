use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

/// Single-shot callback invoked when a countdown reaches zero.
pub type ExpireCallback = Box<dyn FnOnce() + Send + 'static>;

/// Countdown timer ticking once per second towards zero.
///
/// A controller owns at most one ticking source at a time. Restarting or
/// stopping bumps an internal generation counter, and every scheduled tick
/// re-checks that counter before touching state, so a tick left over from a
/// previous run can never decrement the successor timer. Reaching zero is
/// terminal for the active run: the expiry callback fires at most once and no
/// further ticks are delivered.
pub struct Countdown {
    shared: Arc<Mutex<Shared>>,
    remaining_rx: watch::Receiver<u32>,
}

struct Shared {
    total_seconds: u32,
    remaining: u32,
    running: bool,
    generation: u64,
    ticker: Option<JoinHandle<()>>,
    remaining_tx: watch::Sender<u32>,
}

impl Countdown {
    /// Create an idle controller with `remaining` primed to `total_seconds`.
    pub fn new(total_seconds: u32) -> Self {
        let (remaining_tx, remaining_rx) = watch::channel(total_seconds);
        Self {
            shared: Arc::new(Mutex::new(Shared {
                total_seconds,
                remaining: total_seconds,
                running: false,
                generation: 0,
                ticker: None,
                remaining_tx,
            })),
            remaining_rx,
        }
    }

    /// Begin ticking, resetting `remaining` to the configured total.
    ///
    /// Any previously active ticking source is stopped first; its pending
    /// ticks are invalidated and its expiry callback will never fire.
    /// `on_expire` is invoked exactly once when the new run reaches zero.
    pub fn start(&self, on_expire: ExpireCallback) {
        let mut shared = self.lock();
        shared.halt_ticker();
        shared.remaining = shared.total_seconds;
        shared.running = true;
        let _ = shared.remaining_tx.send(shared.remaining);

        let generation = shared.generation;
        let handle = tokio::spawn(run_ticker(self.shared.clone(), generation, on_expire));
        shared.ticker = Some(handle);
    }

    /// Halt ticking. Stopping an already-stopped controller is a no-op.
    pub fn stop(&self) {
        self.lock().halt_ticker();
    }

    /// Replace the configured total, resetting `remaining` to the new value.
    ///
    /// Applies whether the controller is idle or ticking; elapsed time is not
    /// carried over.
    pub fn set_total(&self, total_seconds: u32) {
        let mut shared = self.lock();
        shared.total_seconds = total_seconds;
        shared.remaining = total_seconds;
        let _ = shared.remaining_tx.send(shared.remaining);
    }

    /// Seconds left in the current run.
    pub fn remaining(&self) -> u32 {
        self.lock().remaining
    }

    /// The total the controller was last configured with.
    pub fn total_seconds(&self) -> u32 {
        self.lock().total_seconds
    }

    /// Whether a ticking source is currently active.
    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// Remaining time as a percentage of the total, clamped to `[0, 100]`.
    ///
    /// A zero total yields 0 rather than dividing by zero.
    pub fn percent_remaining(&self) -> f32 {
        let shared = self.lock();
        if shared.total_seconds == 0 {
            0.0
        } else {
            (shared.remaining as f32 / shared.total_seconds as f32 * 100.0).max(0.0)
        }
    }

    /// Subscribe to `remaining` updates, one per delivered tick.
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.remaining_rx.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        // The lock is only held for field updates, never across an await;
        // recover the guard if a panicking thread poisoned it.
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Shared {
    /// Invalidate the active ticking source, if any.
    fn halt_ticker(&mut self) {
        self.generation += 1;
        self.running = false;
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

/// Drive one run of the countdown until expiry or invalidation.
async fn run_ticker(shared: Arc<Mutex<Shared>>, generation: u64, on_expire: ExpireCallback) {
    let mut on_expire = Some(on_expire);
    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; consume it so the countdown
    // advances one second per subsequent tick.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let expired = {
            let mut guard = shared.lock().unwrap_or_else(PoisonError::into_inner);
            if guard.generation != generation {
                // A newer run owns this controller; this tick is stale.
                return;
            }
            if guard.remaining <= 1 {
                guard.remaining = 0;
                guard.running = false;
                guard.ticker = None;
                let _ = guard.remaining_tx.send(0);
                true
            } else {
                guard.remaining -= 1;
                let _ = guard.remaining_tx.send(guard.remaining);
                false
            }
        };

        if expired {
            // Invoke outside the lock so the callback may call back into the
            // controller without deadlocking.
            if let Some(callback) = on_expire.take() {
                callback();
            }
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::time::sleep;

    use super::*;

    fn counting_callback(counter: Arc<AtomicUsize>) -> ExpireCallback {
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_fires_exactly_once_and_remaining_hits_zero() {
        let countdown = Countdown::new(3);
        let fired = Arc::new(AtomicUsize::new(0));
        countdown.start(counting_callback(fired.clone()));

        sleep(Duration::from_secs(10)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(countdown.remaining(), 0);
        assert!(!countdown.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_decrement_once_per_second() {
        let countdown = Countdown::new(5);
        countdown.start(Box::new(|| {}));

        sleep(Duration::from_millis(1500)).await;
        assert_eq!(countdown.remaining(), 4);

        sleep(Duration::from_secs(2)).await;
        assert_eq!(countdown.remaining(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent_and_prevents_expiry() {
        let countdown = Countdown::new(2);
        let fired = Arc::new(AtomicUsize::new(0));
        countdown.start(counting_callback(fired.clone()));

        sleep(Duration::from_millis(500)).await;
        countdown.stop();
        countdown.stop();

        sleep(Duration::from_secs(10)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(countdown.remaining(), 2);
        assert!(!countdown.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_invalidates_the_previous_run() {
        let countdown = Countdown::new(3);
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        countdown.start(counting_callback(first.clone()));
        sleep(Duration::from_millis(1500)).await;
        assert_eq!(countdown.remaining(), 2);

        countdown.start(counting_callback(second.clone()));
        assert_eq!(countdown.remaining(), 3);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn set_total_resets_remaining_without_interpolation() {
        let countdown = Countdown::new(10);
        let fired = Arc::new(AtomicUsize::new(0));
        countdown.start(counting_callback(fired.clone()));

        sleep(Duration::from_millis(2500)).await;
        assert_eq!(countdown.remaining(), 8);

        countdown.set_total(4);
        assert_eq!(countdown.total_seconds(), 4);
        assert_eq!(countdown.remaining(), 4);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(countdown.remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn percent_remaining_guards_zero_total() {
        let countdown = Countdown::new(0);
        assert_eq!(countdown.percent_remaining(), 0.0);

        let countdown = Countdown::new(4);
        assert_eq!(countdown.percent_remaining(), 100.0);
        countdown.start(Box::new(|| {}));
        sleep(Duration::from_millis(1500)).await;
        assert_eq!(countdown.percent_remaining(), 75.0);
    }

    #[tokio::test(start_paused = true)]
    async fn subscriber_observes_each_tick() {
        let countdown = Countdown::new(2);
        let mut updates = countdown.subscribe();
        countdown.start(Box::new(|| {}));

        sleep(Duration::from_secs(5)).await;
        assert!(updates.has_changed().unwrap());
        assert_eq!(*updates.borrow_and_update(), 0);
    }
}
