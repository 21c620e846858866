use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use super::domain::{CandidateId, CandidateSession};

type Slot = Arc<Mutex<Option<CandidateSession>>>;

/// Active questionnaires keyed by candidate.
///
/// Lock order is slot before map whenever both are held; the map lock alone is never held
/// while waiting on a slot.
#[derive(Debug, Default)]
pub struct SessionStore {
    slots: Mutex<HashMap<CandidateId, Slot>>,
    idle_timeout: Option<Duration>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SessionStore {
    pub fn new(idle_timeout: Option<Duration>) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout
    }

    /// Run `f` with exclusive access to the candidate's session slot. Calls for the same
    /// candidate are serialized; other candidates proceed in parallel. An expired session is
    /// cleared before `f` sees it, and a slot left empty is dropped from the store.
    pub fn with_session<T>(
        &self,
        candidate: &CandidateId,
        now: DateTime<Utc>,
        f: impl FnOnce(&mut Option<CandidateSession>) -> T,
    ) -> T {
        loop {
            let slot = lock(&self.slots)
                .entry(candidate.clone())
                .or_default()
                .clone();
            let mut guard = lock(&slot);

            // Evicted or completed while we waited for the slot: start over on a fresh one.
            if !self.is_current(candidate, &slot) {
                continue;
            }

            if guard
                .as_ref()
                .is_some_and(|session| self.is_expired(session, now))
            {
                debug!(%candidate, "idle session expired");
                *guard = None;
            }

            let result = f(&mut *guard);

            match guard.as_mut() {
                Some(session) => session.last_activity = now,
                None => self.remove_slot(candidate, &slot),
            }

            return result;
        }
    }

    /// Copy of the candidate's live session, if any.
    pub fn get(&self, candidate: &CandidateId, now: DateTime<Utc>) -> Option<CandidateSession> {
        let slot = lock(&self.slots).get(candidate).cloned()?;
        let guard = lock(&slot);
        guard
            .as_ref()
            .filter(|session| !self.is_expired(session, now))
            .cloned()
    }

    /// Drop sessions idle for longer than the timeout. Slots busy with a message are skipped.
    pub fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        if self.idle_timeout.is_none() {
            return 0;
        }

        let mut slots = lock(&self.slots);
        let before = slots.len();
        slots.retain(|_, slot| match slot.try_lock() {
            Ok(guard) => guard
                .as_ref()
                .is_some_and(|session| !self.is_expired(session, now)),
            Err(_) => true,
        });
        before - slots.len()
    }

    pub fn len(&self) -> usize {
        lock(&self.slots).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_current(&self, candidate: &CandidateId, slot: &Slot) -> bool {
        lock(&self.slots)
            .get(candidate)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
    }

    fn remove_slot(&self, candidate: &CandidateId, slot: &Slot) {
        let mut slots = lock(&self.slots);
        if slots
            .get(candidate)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            slots.remove(candidate);
        }
    }

    fn is_expired(&self, session: &CandidateSession, now: DateTime<Utc>) -> bool {
        self.idle_timeout
            .is_some_and(|timeout| now - session.last_activity > timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::hiring::intake::domain::IntakeStage;
    use chrono::TimeZone;
    use std::sync::Barrier;
    use std::thread;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, 9, minute, 0)
            .single()
            .expect("valid timestamp")
    }

    fn open(store: &SessionStore, id: &CandidateId, now: DateTime<Utc>) {
        store.with_session(id, now, |slot| {
            *slot = Some(CandidateSession::new(id.clone(), now));
        });
    }

    #[test]
    fn keeps_session_between_calls_and_drops_empty_slots() {
        let store = SessionStore::new(None);
        let id = CandidateId::new("42");

        store.with_session(&id, at(0), |slot| assert!(slot.is_none()));
        assert!(store.is_empty(), "empty slot is not retained");

        open(&store, &id, at(0));
        store.with_session(&id, at(1), |slot| {
            let session = slot.as_mut().expect("session kept");
            session.stage = IntakeStage::AwaitingAge;
        });
        assert_eq!(
            store.get(&id, at(1)).expect("session").stage,
            IntakeStage::AwaitingAge
        );

        store.with_session(&id, at(2), |slot| *slot = None);
        assert!(store.get(&id, at(2)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn expired_session_is_cleared_on_access() {
        let store = SessionStore::new(Some(Duration::minutes(10)));
        let id = CandidateId::new("7");
        open(&store, &id, at(0));

        assert!(store.get(&id, at(10)).is_some(), "exactly at the limit is still live");
        store.with_session(&id, at(11), |slot| assert!(slot.is_none()));
    }

    #[test]
    fn activity_refreshes_idle_clock() {
        let store = SessionStore::new(Some(Duration::minutes(10)));
        let id = CandidateId::new("7");
        open(&store, &id, at(0));
        store.with_session(&id, at(8), |slot| assert!(slot.is_some()));
        assert!(store.get(&id, at(15)).is_some());
    }

    #[test]
    fn evict_idle_removes_only_stale_sessions() {
        let store = SessionStore::new(Some(Duration::minutes(10)));
        let stale = CandidateId::new("stale");
        let fresh = CandidateId::new("fresh");
        open(&store, &stale, at(0));
        open(&store, &fresh, at(5));

        assert_eq!(store.evict_idle(at(12)), 1);
        assert!(store.get(&stale, at(12)).is_none());
        assert!(store.get(&fresh, at(12)).is_some());
    }

    #[test]
    fn without_timeout_nothing_is_evicted() {
        let store = SessionStore::new(None);
        let id = CandidateId::new("1");
        open(&store, &id, at(0));
        assert_eq!(store.evict_idle(at(59)), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn same_candidate_updates_are_serialized() {
        let store = Arc::new(SessionStore::new(None));
        let id = CandidateId::new("busy");
        open(&store, &id, at(0));

        let workers = 8;
        let barrier = Arc::new(Barrier::new(workers));
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                let id = id.clone();
                thread::spawn(move || {
                    barrier.wait();
                    for _ in 0..100 {
                        store.with_session(&id, at(1), |slot| {
                            let session = slot.as_mut().expect("session present");
                            let seen = session.retries;
                            thread::yield_now();
                            session.retries = seen + 1;
                        });
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("worker finished");
        }

        assert_eq!(store.get(&id, at(1)).expect("session").retries, 800);
    }
}
