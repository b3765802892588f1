use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

/// Largest id a client may supply. The counter must still be able to move
/// past it.
pub const MAX_ID: u64 = u64::MAX - 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("id {0} is out of range")]
    OutOfRange(u64),

    #[error("id space exhausted")]
    Exhausted,
}

/// Process-wide id counter for new todos.
///
/// Lives only in memory: it restarts from the configured start value on every
/// boot and is untouched by clearing the store. It never wraps.
#[derive(Debug)]
pub struct IdSequence {
    next: AtomicU64,
}

impl IdSequence {
    pub fn new(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    /// Resolve the id for a new todo.
    ///
    /// `0` takes the next counter value. Any other id is kept, and the
    /// counter moves past it so later auto-assigned ids cannot collide.
    /// Neither path changes the counter on error.
    pub fn assign(&self, requested: u64) -> Result<u64, IdError> {
        if requested == 0 {
            return self
                .next
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |next| {
                    next.checked_add(1)
                })
                .map_err(|_| IdError::Exhausted);
        }
        if requested > MAX_ID {
            return Err(IdError::OutOfRange(requested));
        }
        self.observe(requested);
        Ok(requested)
    }

    /// Advance the counter past an id that is already in use.
    pub fn observe(&self, id: u64) {
        self.next.fetch_max(id.saturating_add(1), Ordering::SeqCst);
    }

    /// Value the next auto-assigned id will take.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}
