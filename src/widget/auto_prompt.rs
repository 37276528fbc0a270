//! Debounced auto-open timer
//!
//! A single pending timer opens the assistant after a stretch of user
//! inactivity. Every qualifying interaction re-arms it, which replaces the
//! pending cancellation token and cancels the old one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_AUTO_PROMPT_DELAY: Duration = Duration::from_secs(30);

/// User activity that postpones the auto-prompt
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    PointerMove,
    KeyPress,
    Scroll,
    Touch,
    Click,
}

/// The live timer: its generation and cancellation token
type Pending = Option<(u64, CancellationToken)>;

pub struct AutoPrompt {
    delay: Duration,
    pending: Arc<Mutex<Pending>>,
    generation: AtomicU64,
}

impl AutoPrompt {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Arc::new(Mutex::new(None)),
            generation: AtomicU64::new(0),
        }
    }

    /// Start the timer, invalidating any timer already pending.
    ///
    /// `on_fire` runs at most once, and never after a later `arm` or
    /// `cancel`. Must be called from within a tokio runtime.
    pub fn arm<F>(&self, on_fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let token = CancellationToken::new();
        let previous = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace((generation, token.clone()));
        if let Some((_, previous)) = previous {
            previous.cancel();
        }

        let pending = Arc::clone(&self.pending);
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => return,
                () = tokio::time::sleep(delay) => {}
            }

            // Only the timer still installed may fire
            let still_current = {
                let mut slot = pending.lock().unwrap_or_else(PoisonError::into_inner);
                match slot.as_ref() {
                    Some((current, t)) if *current == generation && !t.is_cancelled() => {
                        *slot = None;
                        true
                    }
                    _ => false,
                }
            };
            if still_current {
                tracing::debug!(delay_ms = %delay.as_millis(), "Auto-prompt timer fired");
                on_fire();
            }
        });
    }

    pub fn cancel(&self) {
        if let Some((_, token)) = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            token.cancel();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Drop for AutoPrompt {
    fn drop(&mut self) {
        self.cancel();
    }
}
