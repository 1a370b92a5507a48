// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Admission Controller
 * Shared rate and concurrency gate for all outbound probe traffic
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use nonzero_ext::*;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

use crate::types::AdmissionConfig;

/// RAII admission slot. Dropping the permit releases the concurrency slot,
/// so release happens exactly once per `acquire`, on success and failure
/// paths alike.
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
    in_flight: Arc<AtomicUsize>,
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Single shared gate for the whole run. Bounds sustained throughput with
/// a token bucket and peak concurrency with a FIFO semaphore, so the
/// scanner cannot itself flood the target.
///
/// The gate only delays, it never errors and carries no timeout of its
/// own; callers that need to bail out wrap `acquire` in a `select!` with
/// their cancellation signal.
pub struct AdmissionController {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    slots: Arc<Semaphore>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: usize,
}

impl AdmissionController {
    pub fn new(config: AdmissionConfig) -> Self {
        let rps = config.effective_rps();
        let max_in_flight = config.effective_max_in_flight();

        let quota = Quota::per_second(NonZeroU32::new(rps).unwrap_or(nonzero!(1u32)));

        debug!(
            "[Admission] Gate initialized: {} req/s, {} in flight",
            rps, max_in_flight
        );

        Self {
            limiter: RateLimiter::direct(quota),
            slots: Arc::new(Semaphore::new(max_in_flight)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight,
        }
    }

    /// Wait until both the rolling rate and the concurrency ceiling admit
    /// one more request. Tokio's semaphore queues waiters FIFO, so no task
    /// starves under sustained load.
    pub async fn acquire(&self) -> AdmissionPermit {
        self.limiter.until_ready().await;

        let permit = Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .expect("admission semaphore is never closed");

        self.in_flight.fetch_add(1, Ordering::SeqCst);

        AdmissionPermit {
            _permit: permit,
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    /// Number of currently outstanding exchanges. Test instrumentation.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }
}
