use crate::clock::{Clock, SharedClock, SystemClock};
use crate::command::batch::{self, BatchPolicy};
use crate::command::{self, Command, Output};
use crate::config::Config;
use crate::error::{EngineError, EngineResult};
use crate::store::{SharedStore, Store};
use crate::types::geo::{GeoResult, Unit};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

/// Handle to one shared keyspace.
///
/// Cloning is cheap and every clone addresses the same store. Each method
/// holds the store's write guard for the duration of exactly one command,
/// which is what makes commands atomic; [`Engine::run_batch`] holds it
/// across a whole command sequence.
#[derive(Clone)]
pub struct Engine {
    store: SharedStore,
    clock: SharedClock,
    config: Config,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Engine::with_clock(config, Arc::new(SystemClock))
    }

    /// Build an engine on a caller-supplied clock. Tests pair this with
    /// [`crate::clock::ManualClock`] to drive TTLs without sleeping.
    pub fn with_clock(config: Config, clock: SharedClock) -> Self {
        Engine {
            store: Arc::new(RwLock::new(Store::new())),
            clock,
            config,
        }
    }

    fn now(&self) -> u64 {
        self.clock.now_millis()
    }

    // ---- strings & keys ----

    /// Write a string value with no expiry, clearing any prior one.
    pub async fn set(&self, key: &str, value: impl Into<String>) {
        let mut store = self.store.write().await;
        command::string::set(&mut store, key, value.into());
    }

    /// Write a string value that expires `ttl` from now.
    pub async fn set_ex(&self, key: &str, value: impl Into<String>, ttl: Duration) -> EngineResult<()> {
        let mut store = self.store.write().await;
        command::string::set_ex(&mut store, self.now(), key, value.into(), ttl)
    }

    /// Read a string value. `None` is a miss (absent or expired).
    pub async fn get(&self, key: &str) -> EngineResult<Option<String>> {
        let mut store = self.store.write().await;
        command::string::get(&mut store, self.now(), key)
    }

    pub async fn del(&self, key: &str) -> bool {
        let mut store = self.store.write().await;
        command::key::del(&mut store, key)
    }

    pub async fn exists(&self, key: &str) -> bool {
        let mut store = self.store.write().await;
        command::key::exists(&mut store, self.now(), key)
    }

    /// Schedule expiry on an existing key. False if the key is absent.
    pub async fn expire(&self, key: &str, ttl: Duration) -> EngineResult<bool> {
        let mut store = self.store.write().await;
        command::key::expire(&mut store, self.now(), key, ttl)
    }

    /// Cancel a pending expiry.
    pub async fn persist(&self, key: &str) -> bool {
        let mut store = self.store.write().await;
        command::key::persist(&mut store, self.now(), key)
    }

    /// Remaining life in milliseconds; -1 no expiry, -2 missing key.
    pub async fn ttl_millis(&self, key: &str) -> i64 {
        let mut store = self.store.write().await;
        command::key::ttl_millis(&mut store, self.now(), key)
    }

    pub async fn type_name(&self, key: &str) -> Option<&'static str> {
        let mut store = self.store.write().await;
        command::key::type_name(&mut store, self.now(), key)
    }

    /// All live keys, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let store = self.store.read().await;
        command::key::keys(&store, self.now())
    }

    /// A uniformly random live key, if any exist.
    pub async fn random_key(&self) -> Option<String> {
        let store = self.store.read().await;
        store.random_key(self.now())
    }

    pub async fn append(&self, key: &str, value: &str) -> EngineResult<usize> {
        let mut store = self.store.write().await;
        command::string::append(&mut store, self.now(), key, value)
    }

    pub async fn strlen(&self, key: &str) -> EngineResult<usize> {
        let mut store = self.store.write().await;
        command::string::strlen(&mut store, self.now(), key)
    }

    pub async fn incr_by(&self, key: &str, delta: i64) -> EngineResult<i64> {
        let mut store = self.store.write().await;
        command::string::incr_by(&mut store, self.now(), key, delta)
    }

    // ---- lists ----

    pub async fn push_right(&self, key: &str, value: impl Into<String>) -> EngineResult<usize> {
        let mut store = self.store.write().await;
        command::list::push_right(&mut store, self.now(), key, value.into())
    }

    pub async fn push_left(&self, key: &str, value: impl Into<String>) -> EngineResult<usize> {
        let mut store = self.store.write().await;
        command::list::push_left(&mut store, self.now(), key, value.into())
    }

    pub async fn pop_left(&self, key: &str) -> EngineResult<Option<String>> {
        let mut store = self.store.write().await;
        command::list::pop_left(&mut store, self.now(), key)
    }

    pub async fn pop_right(&self, key: &str) -> EngineResult<Option<String>> {
        let mut store = self.store.write().await;
        command::list::pop_right(&mut store, self.now(), key)
    }

    pub async fn list_len(&self, key: &str) -> EngineResult<usize> {
        let mut store = self.store.write().await;
        command::list::len(&mut store, self.now(), key)
    }

    pub async fn list_range(&self, key: &str, start: i64, stop: i64) -> EngineResult<Vec<String>> {
        let mut store = self.store.write().await;
        command::list::range(&mut store, self.now(), key, start, stop)
    }

    // ---- sets ----

    pub async fn set_add(&self, key: &str, member: impl Into<String>) -> EngineResult<bool> {
        let mut store = self.store.write().await;
        command::set::add(&mut store, self.now(), key, member.into())
    }

    pub async fn set_remove(&self, key: &str, member: &str) -> EngineResult<bool> {
        let mut store = self.store.write().await;
        command::set::remove(&mut store, self.now(), key, member)
    }

    pub async fn set_cardinality(&self, key: &str) -> EngineResult<usize> {
        let mut store = self.store.write().await;
        command::set::cardinality(&mut store, self.now(), key)
    }

    /// Members sorted alphabetically.
    pub async fn set_members(&self, key: &str) -> EngineResult<Vec<String>> {
        let mut store = self.store.write().await;
        command::set::members(&mut store, self.now(), key)
    }

    pub async fn set_is_member(&self, key: &str, member: &str) -> EngineResult<bool> {
        let mut store = self.store.write().await;
        command::set::is_member(&mut store, self.now(), key, member)
    }

    // ---- sorted sets ----

    pub async fn zadd(&self, key: &str, member: impl Into<String>, score: f64) -> EngineResult<bool> {
        let mut store = self.store.write().await;
        command::sorted_set::add(&mut store, self.now(), key, member.into(), score)
    }

    pub async fn zscore(&self, key: &str, member: &str) -> EngineResult<Option<f64>> {
        let mut store = self.store.write().await;
        command::sorted_set::score(&mut store, self.now(), key, member)
    }

    pub async fn zrem(&self, key: &str, member: &str) -> EngineResult<bool> {
        let mut store = self.store.write().await;
        command::sorted_set::remove(&mut store, self.now(), key, member)
    }

    pub async fn zcard(&self, key: &str) -> EngineResult<usize> {
        let mut store = self.store.write().await;
        command::sorted_set::cardinality(&mut store, self.now(), key)
    }

    /// Ascending-score slice over inclusive ranks; negative ranks count
    /// from the end, so `zrange(key, 0, -1)` is the whole set.
    pub async fn zrange(&self, key: &str, start: i64, stop: i64) -> EngineResult<Vec<(String, f64)>> {
        let mut store = self.store.write().await;
        command::sorted_set::range(&mut store, self.now(), key, start, stop)
    }

    pub async fn zpop_max(&self, key: &str) -> EngineResult<Option<(String, f64)>> {
        let mut store = self.store.write().await;
        command::sorted_set::pop_max(&mut store, self.now(), key)
    }

    pub async fn zpop_min(&self, key: &str) -> EngineResult<Option<(String, f64)>> {
        let mut store = self.store.write().await;
        command::sorted_set::pop_min(&mut store, self.now(), key)
    }

    // ---- hashes ----

    pub async fn hset(
        &self,
        key: &str,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> EngineResult<bool> {
        let mut store = self.store.write().await;
        command::hash::set_field(&mut store, self.now(), key, field.into(), value.into())
    }

    pub async fn hget(&self, key: &str, field: &str) -> EngineResult<Option<String>> {
        let mut store = self.store.write().await;
        command::hash::get_field(&mut store, self.now(), key, field)
    }

    /// Snapshot of all fields, sorted by field name.
    pub async fn hgetall(&self, key: &str) -> EngineResult<BTreeMap<String, String>> {
        let mut store = self.store.write().await;
        command::hash::get_all(&mut store, self.now(), key)
    }

    pub async fn hdel(&self, key: &str, field: &str) -> EngineResult<bool> {
        let mut store = self.store.write().await;
        command::hash::del_field(&mut store, self.now(), key, field)
    }

    pub async fn hlen(&self, key: &str) -> EngineResult<usize> {
        let mut store = self.store.write().await;
        command::hash::len(&mut store, self.now(), key)
    }

    pub async fn hexists(&self, key: &str, field: &str) -> EngineResult<bool> {
        let mut store = self.store.write().await;
        command::hash::field_exists(&mut store, self.now(), key, field)
    }

    // ---- geo ----

    pub async fn geo_add(
        &self,
        key: &str,
        member: impl Into<String>,
        longitude: f64,
        latitude: f64,
    ) -> EngineResult<bool> {
        let mut store = self.store.write().await;
        command::geo::add_point(&mut store, self.now(), key, member.into(), longitude, latitude)
    }

    pub async fn geo_pos(&self, key: &str, member: &str) -> EngineResult<Option<(f64, f64)>> {
        let mut store = self.store.write().await;
        command::geo::position(&mut store, self.now(), key, member)
    }

    pub async fn geo_dist(
        &self,
        key: &str,
        member_a: &str,
        member_b: &str,
        unit: Unit,
    ) -> EngineResult<f64> {
        let mut store = self.store.write().await;
        command::geo::distance(&mut store, self.now(), key, member_a, member_b, unit)
    }

    /// Members within `radius` of the center, closest first.
    pub async fn geo_search(
        &self,
        key: &str,
        longitude: f64,
        latitude: f64,
        radius: f64,
        unit: Unit,
    ) -> EngineResult<Vec<GeoResult>> {
        let mut store = self.store.write().await;
        command::geo::search_radius(&mut store, self.now(), key, longitude, latitude, radius, unit)
    }

    // ---- cardinality estimator ----

    pub async fn pf_add<I, S>(&self, key: &str, elements: I) -> EngineResult<bool>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let elements: Vec<String> = elements.into_iter().map(Into::into).collect();
        let mut store = self.store.write().await;
        command::hyperloglog::add(&mut store, self.now(), key, &elements)
    }

    pub async fn pf_count(&self, key: &str) -> EngineResult<u64> {
        let mut store = self.store.write().await;
        command::hyperloglog::count(&mut store, self.now(), key)
    }

    pub async fn pf_merge(&self, dest: &str, sources: &[String]) -> EngineResult<()> {
        let mut store = self.store.write().await;
        command::hyperloglog::merge(&mut store, self.now(), dest, sources)
    }

    // ---- batches ----

    /// Run a command sequence atomically under the configured error policy.
    ///
    /// The store guard is taken once for the whole batch: no other command
    /// or batch interleaves, and every effect becomes visible at once when
    /// the guard drops. Rejects an empty batch outright; that is the
    /// batch-level failure, distinct from per-command errors in the
    /// returned vector.
    pub async fn run_batch(&self, commands: &[Command]) -> EngineResult<Vec<EngineResult<Output>>> {
        self.run_batch_with_policy(commands, self.config.batch_policy)
            .await
    }

    pub async fn run_batch_with_policy(
        &self,
        commands: &[Command],
        policy: BatchPolicy,
    ) -> EngineResult<Vec<EngineResult<Output>>> {
        if commands.is_empty() {
            return Err(EngineError::invalid("empty batch"));
        }
        let mut store = self.store.write().await;
        Ok(batch::run(&mut store, self.now(), commands, policy))
    }

    // ---- maintenance ----

    /// Spawn the background expiry sweeper. Each cycle samples keys with a
    /// TTL and reclaims the expired ones; lazy expiry on read stays in
    /// effect regardless, so the sweeper is purely about reclaiming memory
    /// for keys nobody reads again.
    pub fn spawn_expiry_sweeper(&self) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let clock = Arc::clone(&self.clock);
        let config = self.config.clone();
        tokio::spawn(async move {
            if !config.active_expire_enabled {
                return;
            }
            let period = Duration::from_millis((1000 / config.hz.max(1)).max(1));
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let now = clock.now_millis();
                let reclaimed = {
                    let mut store = store.write().await;
                    store.active_expire(now, config.active_expire_sample)
                };
                if reclaimed > 0 {
                    debug!(reclaimed, "expiry sweep reclaimed keys");
                }
            }
        })
    }

    /// Drop every key.
    pub async fn flush(&self) {
        let mut store = self.store.write().await;
        store.flush();
    }

    /// Number of keys physically present (expired stragglers included).
    pub async fn key_count(&self) -> usize {
        let store = self.store.read().await;
        store.len()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(Config::default())
    }
}
