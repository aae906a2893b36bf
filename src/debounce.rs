//! Trailing-edge debounce on top of tokio timers.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

struct Timer {
    generation: u64,
    handle: Option<JoinHandle<()>>,
    fired: bool,
}

/// Runs the work of the last call once `delay` has passed without another
/// call. A call that arrives while a timer is still waiting replaces it; work
/// whose timer already fired is left to finish.
///
/// Must be called from within a tokio runtime.
pub struct Debouncer {
    name: &'static str,
    delay: Duration,
    timer: Arc<Mutex<Timer>>,
}

impl Debouncer {
    pub fn new(name: &'static str, delay: Duration) -> Debouncer {
        Debouncer {
            name: name,
            delay: delay,
            timer: Arc::new(Mutex::new(Timer {
                generation: 0,
                handle: None,
                fired: true,
            })),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn call<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut timer = self.timer.lock();
        if let Some(handle) = timer.handle.take() {
            if !timer.fired {
                debug!("{}: superseded pending call", self.name);
                handle.abort();
            }
        }

        timer.generation += 1;
        timer.fired = false;
        let generation = timer.generation;
        let shared = self.timer.clone();
        let delay = self.delay;
        let name = self.name;

        timer.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                // the abort above can lose the race against the wake-up
                let mut timer = shared.lock();
                if timer.generation != generation {
                    return;
                }
                timer.fired = true;
            }
            debug!("{}: firing after {:?}", name, delay);
            work.await;
        }));
    }

    /// True while a timer is waiting to fire.
    pub fn is_pending(&self) -> bool {
        !self.timer.lock().fired
    }

    /// Drops a waiting call, if any. Work that already started is unaffected.
    pub fn cancel(&self) {
        let mut timer = self.timer.lock();
        if !timer.fired {
            timer.generation += 1;
            timer.fired = true;
            if let Some(handle) = timer.handle.take() {
                handle.abort();
            }
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
