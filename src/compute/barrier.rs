//! Reusable rendezvous barrier with leader election and cancellation.

use std::sync::{Condvar, Mutex, MutexGuard};

/// Arrival count and epoch, guarded by the barrier mutex.
#[derive(Debug, Default)]
struct BarrierState {
    arrived: usize,
    epoch: u64,
    cancelled: bool,
}

/// Outcome of a successful [`GenerationBarrier::arrive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarrierWait {
    epoch: u64,
    leader: bool,
}

impl BarrierWait {
    /// True for exactly one participant per epoch (the last to arrive).
    #[inline]
    pub fn is_leader(&self) -> bool {
        self.leader
    }

    /// Epoch that this arrival completed.
    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Barrier for a fixed number of participants, reusable across any number of epochs.
///
/// Every participant must call [`arrive`](Self::arrive) the same number of
/// times. Once `participants` arrivals are counted, all are released and the
/// epoch advances.
#[derive(Debug)]
pub struct GenerationBarrier {
    participants: usize,
    state: Mutex<BarrierState>,
    released: Condvar,
}

impl GenerationBarrier {
    pub fn new(participants: usize) -> Result<Self, SyncError> {
        if participants == 0 {
            return Err(SyncError::NoParticipants);
        }
        Ok(Self {
            participants,
            state: Mutex::new(BarrierState::default()),
            released: Condvar::new(),
        })
    }

    #[inline]
    pub fn participants(&self) -> usize {
        self.participants
    }

    /// Number of completed epochs.
    pub fn epoch(&self) -> u64 {
        self.lock().epoch
    }

    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    /// Block until all participants have arrived for the current epoch.
    ///
    /// Returns [`SyncError::Cancelled`] if the barrier is cancelled before or
    /// while waiting.
    pub fn arrive(&self) -> Result<BarrierWait, SyncError> {
        let mut state = self.lock();
        if state.cancelled {
            return Err(SyncError::Cancelled);
        }

        let epoch = state.epoch;
        state.arrived += 1;
        if state.arrived == self.participants {
            state.arrived = 0;
            state.epoch += 1;
            self.released.notify_all();
            return Ok(BarrierWait {
                epoch,
                leader: true,
            });
        }

        while state.epoch == epoch && !state.cancelled {
            state = self
                .released
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }

        // A release that raced with cancellation still counts.
        if state.epoch == epoch {
            return Err(SyncError::Cancelled);
        }
        Ok(BarrierWait {
            epoch,
            leader: false,
        })
    }

    /// Release every waiter with an error and fail all future arrivals.
    pub fn cancel(&self) {
        let mut state = self.lock();
        if !state.cancelled {
            log::debug!("Barrier cancelled at epoch {}", state.epoch);
        }
        state.cancelled = true;
        self.released.notify_all();
    }

    fn lock(&self) -> MutexGuard<'_, BarrierState> {
        // No user code runs while the lock is held, so a poisoned state is still consistent.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Synchronization errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("Barrier requires at least one participant")]
    NoParticipants,
    #[error("Barrier was cancelled")]
    Cancelled,
}
