// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory store with typed operations.
//!
//! Provides keyed operations for:
//! - Users (roster) and athlete profiles
//! - Runs and their position fixes
//! - Challenge awards (with the per-athlete uniqueness index)
//! - Collectible items
//!
//! Ids come from per-collection counters, so ascending id equals insertion
//! order; every listing sorts by id to honor that order.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::models::{
    AthleteInfo, Challenge, ChallengeKind, CollectibleItem, Position, Run, RunStatus, User,
    UserRole,
};

/// Shared application store.
///
/// Cheap to clone; all clones see the same data.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

struct Inner {
    users: DashMap<u64, User>,
    athlete_info: DashMap<u64, AthleteInfo>,
    runs: DashMap<u64, Run>,
    positions: DashMap<u64, Position>,
    challenges: DashMap<u64, Challenge>,
    /// Unique (athlete, kind) index for the deduplicated award kinds.
    awarded: DashMap<(u64, ChallengeKind), u64>,
    items: DashMap<u64, CollectibleItem>,
    /// Advisory per-run locks serializing ingest, finish and deletion.
    run_locks: DashMap<u64, Arc<Mutex<()>>>,
    next_user_id: AtomicU64,
    next_run_id: AtomicU64,
    next_position_id: AtomicU64,
    next_challenge_id: AtomicU64,
    next_item_id: AtomicU64,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                users: DashMap::new(),
                athlete_info: DashMap::new(),
                runs: DashMap::new(),
                positions: DashMap::new(),
                challenges: DashMap::new(),
                awarded: DashMap::new(),
                items: DashMap::new(),
                run_locks: DashMap::new(),
                next_user_id: AtomicU64::new(1),
                next_run_id: AtomicU64::new(1),
                next_position_id: AtomicU64::new(1),
                next_challenge_id: AtomicU64::new(1),
                next_item_id: AtomicU64::new(1),
            }),
        }
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Add a user to the roster.
    pub fn create_user(
        &self,
        username: &str,
        first_name: &str,
        last_name: &str,
        role: UserRole,
    ) -> User {
        let user = User {
            id: self.inner.next_user_id.fetch_add(1, Ordering::Relaxed),
            username: username.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            joined_at: Utc::now(),
            role,
        };
        self.inner.users.insert(user.id, user.clone());
        user
    }

    pub fn get_user(&self, user_id: u64) -> Option<User> {
        self.inner
            .users
            .get(&user_id)
            .map(|entry| entry.value().clone())
    }

    /// All users in roster (insertion) order.
    pub fn list_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self
            .inner
            .users
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        users.sort_by_key(|u| u.id);
        users
    }

    // ─── Athlete Profile Operations ──────────────────────────────

    pub fn get_athlete_info(&self, athlete_id: u64) -> Option<AthleteInfo> {
        self.inner
            .athlete_info
            .get(&athlete_id)
            .map(|entry| entry.value().clone())
    }

    /// Create or replace an athlete profile.
    pub fn set_athlete_info(&self, info: &AthleteInfo) {
        self.inner
            .athlete_info
            .insert(info.athlete_id, info.clone());
    }

    // ─── Run Operations ──────────────────────────────────────────

    /// Create a run in the `Init` state.
    pub fn create_run(&self, athlete_id: u64, comment: &str) -> Run {
        let run = Run {
            id: self.inner.next_run_id.fetch_add(1, Ordering::Relaxed),
            athlete_id,
            comment: comment.to_string(),
            status: RunStatus::Init,
            created_at: Utc::now(),
            distance: None,
            run_time_seconds: None,
            speed: None,
        };
        self.inner.runs.insert(run.id, run.clone());
        run
    }

    pub fn get_run(&self, run_id: u64) -> Option<Run> {
        self.inner
            .runs
            .get(&run_id)
            .map(|entry| entry.value().clone())
    }

    /// Replace a run record in one keyed write.
    ///
    /// The finish transition relies on this being a single write: readers see
    /// either the old record or the fully derived one, never a mix.
    pub fn set_run(&self, run: &Run) {
        self.inner.runs.insert(run.id, run.clone());
    }

    /// Delete a run and every position recorded for it.
    ///
    /// Removal happens under the run's advisory lock: an ingest or finish
    /// already inside its critical section completes first (its writes are
    /// then cascaded away with the run), and one arriving later finds the
    /// run gone. A fix can never outlive its run.
    pub async fn delete_run(&self, run_id: u64) -> Option<Run> {
        let lock = self.run_lock(run_id);
        let _guard = lock.lock().await;

        let (_, run) = self.inner.runs.remove(&run_id)?;
        self.inner.positions.retain(|_, p| p.run_id != run_id);
        self.inner.run_locks.remove(&run_id);
        Some(run)
    }

    /// Runs in insertion order, optionally narrowed by status and athlete.
    pub fn list_runs(&self, status: Option<RunStatus>, athlete_id: Option<u64>) -> Vec<Run> {
        let mut runs: Vec<Run> = self
            .inner
            .runs
            .iter()
            .filter(|entry| status.is_none_or(|s| entry.value().status == s))
            .filter(|entry| athlete_id.is_none_or(|a| entry.value().athlete_id == a))
            .map(|entry| entry.value().clone())
            .collect();
        runs.sort_by_key(|r| r.id);
        runs
    }

    /// Number of finished runs for an athlete.
    pub fn finished_run_count(&self, athlete_id: u64) -> usize {
        self.inner
            .runs
            .iter()
            .filter(|entry| {
                entry.value().athlete_id == athlete_id
                    && entry.value().status == RunStatus::Finished
            })
            .count()
    }

    /// Total kilometers over an athlete's finished runs.
    pub fn finished_distance_total(&self, athlete_id: u64) -> f64 {
        self.inner
            .runs
            .iter()
            .filter(|entry| {
                entry.value().athlete_id == athlete_id
                    && entry.value().status == RunStatus::Finished
            })
            .filter_map(|entry| entry.value().distance)
            .sum()
    }

    /// Advisory lock for one run.
    ///
    /// Ingest, finish and [`Store::delete_run`] hold this lock so fixes for
    /// the same run are appended one at a time and never interleave with the
    /// finish write or with the run's removal.
    pub fn run_lock(&self, run_id: u64) -> Arc<Mutex<()>> {
        self.inner
            .run_locks
            .entry(run_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    // ─── Position Operations ─────────────────────────────────────

    /// Record a fix. Ids ascend in arrival order.
    pub fn create_position(
        &self,
        run_id: u64,
        latitude: f64,
        longitude: f64,
        timestamp: Option<DateTime<Utc>>,
        distance: Option<f64>,
        speed: Option<f64>,
    ) -> Position {
        let position = Position {
            id: self.inner.next_position_id.fetch_add(1, Ordering::Relaxed),
            run_id,
            latitude,
            longitude,
            timestamp,
            distance,
            speed,
        };
        self.inner.positions.insert(position.id, position.clone());
        position
    }

    pub fn get_position(&self, position_id: u64) -> Option<Position> {
        self.inner
            .positions
            .get(&position_id)
            .map(|entry| entry.value().clone())
    }

    /// Delete one fix. Later fixes keep their stored cumulative values.
    pub fn delete_position(&self, position_id: u64) -> Option<Position> {
        self.inner
            .positions
            .remove(&position_id)
            .map(|(_, position)| position)
    }

    /// Fixes in arrival (id) order, optionally narrowed to one run.
    pub fn list_positions(&self, run_id: Option<u64>) -> Vec<Position> {
        let mut positions: Vec<Position> = self
            .inner
            .positions
            .iter()
            .filter(|entry| run_id.is_none_or(|id| entry.value().run_id == id))
            .map(|entry| entry.value().clone())
            .collect();
        positions.sort_by_key(|p| p.id);
        positions
    }

    /// Fixes for a run in arrival (id) order.
    pub fn positions_for_run(&self, run_id: u64) -> Vec<Position> {
        self.list_positions(Some(run_id))
    }

    /// The most recently recorded fix for a run, by id.
    ///
    /// Arrival order is authoritative here; the fix's own timestamp plays no
    /// part in ordering.
    pub fn last_position_for_run(&self, run_id: u64) -> Option<Position> {
        self.inner
            .positions
            .iter()
            .filter(|entry| entry.value().run_id == run_id)
            .max_by_key(|entry| entry.value().id)
            .map(|entry| entry.value().clone())
    }

    // ─── Challenge Operations ────────────────────────────────────

    /// Record an award.
    ///
    /// For deduplicated kinds the (athlete, kind) index is claimed first;
    /// losing that claim returns [`AppError::AlreadyExists`], which callers
    /// translate to "someone got there first".
    pub fn create_challenge(
        &self,
        athlete_id: u64,
        kind: ChallengeKind,
    ) -> Result<Challenge, AppError> {
        if kind.dedup_per_athlete() {
            // Entry API makes the claim-and-insert atomic.
            return match self.inner.awarded.entry((athlete_id, kind)) {
                dashmap::mapref::entry::Entry::Occupied(_) => {
                    Err(AppError::AlreadyExists(format!(
                        "challenge \"{}\" already awarded to athlete {}",
                        kind.display_name(),
                        athlete_id
                    )))
                }
                dashmap::mapref::entry::Entry::Vacant(entry) => {
                    let id = self.inner.next_challenge_id.fetch_add(1, Ordering::Relaxed);
                    entry.insert(id);
                    let challenge = Challenge {
                        id,
                        athlete_id,
                        kind,
                    };
                    self.inner.challenges.insert(id, challenge.clone());
                    Ok(challenge)
                }
            };
        }

        let id = self.inner.next_challenge_id.fetch_add(1, Ordering::Relaxed);
        let challenge = Challenge {
            id,
            athlete_id,
            kind,
        };
        self.inner.challenges.insert(id, challenge.clone());
        Ok(challenge)
    }

    /// Whether an athlete already holds an award of this kind.
    pub fn has_challenge(&self, athlete_id: u64, kind: ChallengeKind) -> bool {
        if kind.dedup_per_athlete() {
            return self.inner.awarded.contains_key(&(athlete_id, kind));
        }
        self.inner
            .challenges
            .iter()
            .any(|entry| entry.value().athlete_id == athlete_id && entry.value().kind == kind)
    }

    /// Awards in grant order, optionally narrowed to one athlete.
    pub fn list_challenges(&self, athlete_id: Option<u64>) -> Vec<Challenge> {
        let mut challenges: Vec<Challenge> = self
            .inner
            .challenges
            .iter()
            .filter(|entry| athlete_id.is_none_or(|a| entry.value().athlete_id == a))
            .map(|entry| entry.value().clone())
            .collect();
        challenges.sort_by_key(|c| c.id);
        challenges
    }

    // ─── Collectible Item Operations ─────────────────────────────

    /// Add a collectible item to the map, initially unowned.
    pub fn create_item(
        &self,
        name: &str,
        uid: &str,
        latitude: f64,
        longitude: f64,
        picture: &str,
        value: i64,
    ) -> CollectibleItem {
        let item = CollectibleItem {
            id: self.inner.next_item_id.fetch_add(1, Ordering::Relaxed),
            name: name.to_string(),
            uid: uid.to_string(),
            latitude,
            longitude,
            picture: picture.to_string(),
            value,
            owners: HashSet::new(),
        };
        self.inner.items.insert(item.id, item.clone());
        item
    }

    pub fn get_item(&self, item_id: u64) -> Option<CollectibleItem> {
        self.inner
            .items
            .get(&item_id)
            .map(|entry| entry.value().clone())
    }

    /// Items in insertion order.
    pub fn list_items(&self) -> Vec<CollectibleItem> {
        let mut items: Vec<CollectibleItem> = self
            .inner
            .items
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        items.sort_by_key(|i| i.id);
        items
    }

    /// Items the athlete has not collected yet, in insertion order.
    pub fn items_not_owned_by(&self, athlete_id: u64) -> Vec<CollectibleItem> {
        let mut items: Vec<CollectibleItem> = self
            .inner
            .items
            .iter()
            .filter(|entry| !entry.value().owners.contains(&athlete_id))
            .map(|entry| entry.value().clone())
            .collect();
        items.sort_by_key(|i| i.id);
        items
    }

    /// Items the athlete has collected, in insertion order.
    pub fn items_owned_by(&self, athlete_id: u64) -> Vec<CollectibleItem> {
        let mut items: Vec<CollectibleItem> = self
            .inner
            .items
            .iter()
            .filter(|entry| entry.value().owners.contains(&athlete_id))
            .map(|entry| entry.value().clone())
            .collect();
        items.sort_by_key(|i| i.id);
        items
    }

    /// Mark an item as collected by an athlete.
    ///
    /// Idempotent. Returns whether the owner set actually grew.
    pub fn attach_item_owner(&self, item_id: u64, athlete_id: u64) -> bool {
        match self.inner.items.get_mut(&item_id) {
            Some(mut item) => item.owners.insert(athlete_id),
            None => false,
        }
    }
}
