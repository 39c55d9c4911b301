use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, TimeDelta, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::update::ReleasePayload;

pub const DEFAULT_RELEASE_TTL: TimeDelta = TimeDelta::hours(1);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedRelease {
    pub payload: ReleasePayload,
    pub expires_at: DateTime<Utc>,
}

impl CachedRelease {
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Single shared slot holding the last successfully fetched release.
///
/// Two concurrent misses may both fetch; the later store wins.
#[derive(Debug)]
pub struct ReleaseCache {
    slot: RwLock<Option<CachedRelease>>,
    ttl: TimeDelta,
}

impl Default for ReleaseCache {
    fn default() -> Self {
        Self::new(DEFAULT_RELEASE_TTL)
    }
}

impl ReleaseCache {
    #[must_use]
    pub fn new(ttl: TimeDelta) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
        }
    }

    #[must_use]
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    #[must_use]
    pub fn get(&self) -> Option<ReleasePayload> {
        self.get_at(Utc::now())
    }

    /// The cached payload if it has not expired at `now`. An expired entry is
    /// dropped.
    #[must_use]
    pub fn get_at(&self, now: DateTime<Utc>) -> Option<ReleasePayload> {
        {
            let guard = self.slot.read().unwrap_or_else(PoisonError::into_inner);
            match guard.as_ref() {
                None => return None,
                Some(entry) if !entry.is_expired_at(now) => return Some(entry.payload.clone()),
                Some(_) => {}
            }
        }

        let mut guard = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if guard.as_ref().is_some_and(|entry| entry.is_expired_at(now)) {
            debug!("Cached release expired, dropping it");
            *guard = None;
        }
        None
    }

    pub fn store(&self, payload: ReleasePayload) {
        self.store_at(payload, Utc::now());
    }

    pub fn store_at(&self, payload: ReleasePayload, now: DateTime<Utc>) {
        let entry = CachedRelease {
            payload,
            expires_at: now + self.ttl,
        };
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(entry);
    }

    /// Current entry, expired or not, for persisting between processes.
    #[must_use]
    pub fn snapshot(&self) -> Option<CachedRelease> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Seed the slot from a persisted entry, keeping its original expiry.
    pub fn restore(&self, entry: CachedRelease) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(entry);
    }

    pub fn clear(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
