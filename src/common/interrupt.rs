//! A cancellation token shared between the caller and a running
//! learn/prune computation.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::{RptError, Result};


/// Cancellation flag plus an optional deadline.
/// Cloning an `Interrupt` shares the flag,
/// so `cancel` on any clone stops every computation holding it.
///
/// # Example
/// ```no_run
/// use rptree::prelude::*;
/// use std::time::Duration;
///
/// let interrupt = Interrupt::new()
///     .with_timeout(Duration::from_secs(60));
/// let handle = interrupt.clone();
/// // From another thread:
/// handle.cancel();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}


impl Interrupt {
    /// Construct a token that never fires until [`Interrupt::cancel`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }


    /// Fail once `deadline` has passed.
    #[inline]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }


    /// Fail once `timeout` has elapsed from now.
    #[inline]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }


    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }


    /// Returns `true` if [`Interrupt::cancel`] has been called.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }


    /// Returns an error if the computation should stop.
    #[inline]
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(RptError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline
                => Err(RptError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}
