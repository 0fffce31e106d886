//! Bounded retry with a fixed delay between attempts.
//!
//! Used for destination writes that can fail while an external viewer or a
//! sync tool briefly holds a handle on the output file.

use std::io;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Number of retries after the first failed attempt
pub const DEFAULT_RETRIES: u32 = 3;
/// Pause between attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// Error returned once the policy gives up
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

impl RetryPolicy {
    pub fn new(retries: u32, delay: Duration) -> Self {
        Self { retries, delay }
    }

    /// Policy that never retries
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Total number of attempts this policy allows
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Runs `op` until it succeeds, fails with an error `is_transient`
    /// rejects, or the attempts run out. `op` receives the 1-based attempt.
    pub fn run<T, E, F, P>(&self, mut op: F, is_transient: P) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut(u32) -> Result<T, E>,
        P: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let max_attempts = self.max_attempts();
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("Succeeded on attempt {}/{}", attempt, max_attempts);
                    }
                    return Ok(value);
                }
                Err(err) if attempt < max_attempts && is_transient(&err) => {
                    warn!(
                        "Attempt {}/{} failed: {}, retrying in {:?}",
                        attempt, max_attempts, err, self.delay
                    );
                    if !self.delay.is_zero() {
                        thread::sleep(self.delay);
                    }
                    attempt += 1;
                }
                Err(err) => {
                    return Err(RetryExhausted {
                        attempts: attempt,
                        last_error: err,
                    })
                }
            }
        }
    }
}

/// I/O failures caused by another process holding the file
pub fn is_lock_error(err: &io::Error) -> bool {
    if matches!(err.kind(), io::ErrorKind::PermissionDenied | io::ErrorKind::WouldBlock) {
        return true;
    }
    // ERROR_SHARING_VIOLATION / ERROR_LOCK_VIOLATION
    cfg!(windows) && matches!(err.raw_os_error(), Some(32) | Some(33))
}
