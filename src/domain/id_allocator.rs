//! Process-wide sequential id allocator.
//!
//! The allocator is seeded once from the record store's current maximum id and
//! then hands out ids from an in-memory atomic counter. It is constructed once
//! in [`crate::server::run`] and shared through [`crate::state::AppState`].
//!
//! # Guarantees
//!
//! - Ids are strictly increasing and never reissued within the process.
//! - An id handed out but never persisted (crash, lost insert race) is skipped.
//! - Only one allocator may own a store. A second process writing to the same
//!   store would collide on the primary key.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use crate::domain::repositories::RecordRepository;
use crate::error::AppError;

/// Errors returned by [`IdAllocator::allocate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocatorError {
    #[error("id allocator has not been initialized")]
    NotReady,

    #[error("id space exhausted")]
    Exhausted,
}

/// Sequential id source seeded from the record store.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: OnceLock<AtomicU64>,
}

impl IdAllocator {
    /// Creates an allocator that is not ready until [`Self::initialize`] completes.
    pub fn new() -> Self {
        Self {
            next: OnceLock::new(),
        }
    }

    /// Seeds the counter from the store's maximum id.
    ///
    /// Sets the next id to `max + 1`, or `0` when the store is empty. Calling
    /// this on an already seeded allocator leaves the counter untouched.
    ///
    /// Returns the next id the allocator will issue.
    ///
    /// # Errors
    ///
    /// Propagates store errors; the allocator stays not ready in that case.
    pub async fn initialize<R>(&self, store: &R) -> Result<u64, AppError>
    where
        R: RecordRepository + ?Sized,
    {
        if let Some(next) = self.peek_next() {
            tracing::warn!(next, "Id allocator already initialized");
            return Ok(next);
        }

        let max_id = store.max_id().await?;
        let seed = match max_id {
            Some(max) => max.checked_add(1).ok_or(AllocatorError::Exhausted)?,
            None => 0,
        };

        self.seed(seed);

        let next = self.peek_next().unwrap_or(seed);
        tracing::info!(?max_id, next, "Id allocator initialized");

        Ok(next)
    }

    /// Seeds the counter directly, if not seeded yet.
    pub(crate) fn seed(&self, next: u64) {
        let _ = self.next.set(AtomicU64::new(next));
    }

    /// Returns the current id and advances the counter.
    ///
    /// # Errors
    ///
    /// Returns [`AllocatorError::NotReady`] before initialization and
    /// [`AllocatorError::Exhausted`] when the counter reaches `u64::MAX`.
    pub fn allocate(&self) -> Result<u64, AllocatorError> {
        let counter = self.next.get().ok_or(AllocatorError::NotReady)?;

        counter
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_add(1))
            .map_err(|_| AllocatorError::Exhausted)
    }

    /// Returns whether the allocator has been seeded.
    pub fn is_ready(&self) -> bool {
        self.next.get().is_some()
    }

    /// Returns the id the next [`Self::allocate`] call would issue.
    pub fn peek_next(&self) -> Option<u64> {
        self.next.get().map(|n| n.load(Ordering::Acquire))
    }
}
