//! Pool Manager
//!
//! Category-keyed pooling for animated instances of both families, with
//! lifecycle tracking, capacity policy, timed recycling, and recycling on
//! animation completion.
//!
//! # Design Principles
//!
//! - **Explicit Service**: Built with `create`, torn down with `shutdown`,
//!   passed by reference to whatever spawns effects
//! - **Generational Ids**: Callers hold `InstanceId`s; every recycle retires
//!   the id, so late timers and completions can never hit a later occupant
//! - **Never Fatal**: Unknown categories, exhausted pools, and bad recycles
//!   are logged and reported as events, not raised
//! - **Snapshot Iteration**: Any walk over the active set iterates a copy of
//!   its keys, since recycling mutates it
//!
//! # Example
//!
//! ```ignore
//! let mut pools = PoolManager::create(factory, settings);
//!
//! // Fire and forget: recycled when "explode" finishes
//! pools.spawn_auto_recycle(WorldEffect::HitEffect, Placement::at(pos), "explode", false);
//!
//! // Fixed lifetime
//! pools.spawn_timed(OverlayEffect::ScorePopup, Placement::default(), Duration::from_secs(1));
//!
//! // Once per frame
//! pools.tick(delta);
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use hecs::Entity;
use rustc_hash::FxHashMap;

use super::category::Category;
use super::config::{ConfigError, PoolConfig, PoolSettings};
use super::error::PoolError;
use super::instance::{InstanceFactory, Placement, Poolable};
use super::slots::{InstanceId, InstanceSlots};
use super::stats::{Counters, PoolStats, format_report};
use crate::animation::{AnimationControl, TrackHandle};
use crate::core::{DeferredQueue, EventQueue, PoolEvent, Time};

// ============================================================================
// Administrative Actions
// ============================================================================

/// Operational actions exposed to tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminAction {
    /// Warm up every startup config not yet registered
    WarmupAll,
    /// Log a statistics table
    LogStatistics,
    /// Recycle every active instance
    ResetAll,
    /// Zero all counters
    ResetStatistics,
}

// ============================================================================
// Category Pool
// ============================================================================

/// Idle queue and policy for one category
#[derive(Debug)]
struct CategoryPool {
    config: PoolConfig,
    /// Slot indices of idle instances, oldest first
    idle: VecDeque<usize>,
}

// ============================================================================
// Pool Manager
// ============================================================================

/// Owns every pooled instance and the holding container idle ones park in.
pub struct PoolManager<F: InstanceFactory> {
    /// Instance construction and destruction
    factory: F,
    /// Parent node for idle instances
    container: Entity,
    /// Every instance owned, idle or active
    slots: InstanceSlots<F::Instance>,
    /// Registered pools
    pools: FxHashMap<Category, CategoryPool>,
    /// Active instances and their categories
    active: FxHashMap<InstanceId, Category>,
    /// Statistics counters
    counters: FxHashMap<Category, Counters>,
    /// One-shot completion watches for auto-recycled instances
    watches: FxHashMap<InstanceId, TrackHandle>,
    /// Timed recycles
    timers: DeferredQueue<InstanceId>,
    /// Manager clock
    time: Time,
    /// Lifecycle events
    events: EventQueue,
    /// Configs supplied at creation, for `warmup_all`
    startup: Vec<PoolConfig>,
    /// Scratch buffer for completion reports
    completed: Vec<TrackHandle>,
}

impl<F: InstanceFactory> PoolManager<F> {
    /// Create a manager with no startup configuration.
    pub fn new(factory: F) -> Self {
        Self::build(
            factory,
            PoolSettings {
                warmup_on_create: false,
                ..PoolSettings::default()
            },
        )
    }

    /// Create a manager for `settings`.
    ///
    /// Allocates the holding container and, if `settings.warmup_on_create`
    /// is set, warms up every configured pool. Settings that fail
    /// [`PoolSettings::validate`] are logged and used as given: duplicates
    /// are skipped at warmup and missing categories stay unpooled. Use
    /// [`try_create`](Self::try_create) to refuse them instead.
    pub fn create(factory: F, settings: PoolSettings) -> Self {
        if let Err(error) = settings.validate() {
            log::warn!("Pool settings are invalid, pooling what is configured: {error}");
        }
        Self::build(factory, settings)
    }

    /// Create a manager for `settings` after validating them.
    ///
    /// # Errors
    ///
    /// Returns the first validation problem; the factory is dropped untouched.
    pub fn try_create(factory: F, settings: PoolSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self::build(factory, settings))
    }

    fn build(mut factory: F, settings: PoolSettings) -> Self {
        let container = factory.create_container();
        let mut manager = Self {
            factory,
            container,
            slots: InstanceSlots::new(),
            pools: FxHashMap::default(),
            active: FxHashMap::default(),
            counters: FxHashMap::default(),
            watches: FxHashMap::default(),
            timers: DeferredQueue::new(),
            time: Time::new(),
            events: EventQueue::new(),
            startup: settings.configs(),
            completed: Vec::new(),
        };

        if settings.warmup_on_create {
            manager.warmup_all();
        }
        log::info!(
            "Pool manager created with {} pools",
            manager.pools.len()
        );
        manager
    }

    /// Destroy every instance and the holding container, and return the
    /// factory.
    pub fn shutdown(mut self) -> F {
        let active = self.active.len();
        self.active.clear();
        self.watches.clear();
        self.timers.clear();
        self.pools.clear();

        let mut destroyed = 0;
        for instance in self.slots.drain() {
            self.factory.destroy(instance);
            destroyed += 1;
        }
        self.factory.destroy_container(self.container);

        log::info!(
            "Pool manager shut down: destroyed {} instances ({} active)",
            destroyed,
            active
        );
        self.factory
    }

    // -------------------------------------------------------------------------
    // Warmup
    // -------------------------------------------------------------------------

    /// Register and preload every config whose category is not yet pooled.
    ///
    /// Returns the number of categories registered by this call.
    pub fn warmup(&mut self, configs: &[PoolConfig]) -> usize {
        configs
            .iter()
            .filter(|config| self.warmup_one(config))
            .count()
    }

    /// Warm up the configs supplied at creation.
    pub fn warmup_all(&mut self) -> usize {
        let configs = std::mem::take(&mut self.startup);
        let registered = self.warmup(&configs);
        self.startup = configs;
        registered
    }

    fn warmup_one(&mut self, config: &PoolConfig) -> bool {
        let category = config.category;
        if self.pools.contains_key(&category) {
            log::warn!("Pool '{}' already exists", category);
            return false;
        }
        let Some(template) = config.template() else {
            self.fault(PoolError::TemplateMissing(category));
            return false;
        };

        let mut config = config.clone();
        if config.preload_count > config.max_pool_size {
            log::warn!(
                "Pool '{}' preload {} exceeds max {}, clamping",
                category,
                config.preload_count,
                config.max_pool_size
            );
            config.preload_count = config.max_pool_size;
        }

        let mut idle = VecDeque::with_capacity(config.preload_count);
        for _ in 0..config.preload_count {
            match self.factory.instantiate(template, category, self.container) {
                Some(instance) => idle.push_back(self.park_new(instance)),
                None => {
                    for index in idle {
                        if let Some(instance) = self.slots.remove(index) {
                            self.factory.destroy(instance);
                        }
                    }
                    self.fault(PoolError::TemplateMissing(category));
                    return false;
                }
            }
        }

        let preloaded = idle.len();
        self.counters.insert(
            category,
            Counters {
                created: preloaded as u64,
                ..Counters::default()
            },
        );
        self.pools.insert(category, CategoryPool { config, idle });
        self.events.record(PoolEvent::WarmedUp {
            category,
            preloaded,
        });
        log::info!("Created pool '{}' with {} instances", category, preloaded);
        true
    }

    /// Store a freshly built instance as idle
    fn park_new(&mut self, mut instance: F::Instance) -> usize {
        instance.set_active(false);
        instance.attach(Some(self.container));
        instance.reset_to_neutral_pose();
        self.slots.insert(instance)
    }

    // -------------------------------------------------------------------------
    // Spawn
    // -------------------------------------------------------------------------

    /// Take an instance of `category` and place it.
    ///
    /// Returns `None` (and logs) if the category is unknown, or its pool is
    /// empty and not expandable.
    pub fn spawn(
        &mut self,
        category: impl Into<Category>,
        placement: impl Into<Placement>,
    ) -> Option<InstanceId> {
        match self.try_spawn(category, placement) {
            Ok(id) => Some(id),
            Err(error) => {
                self.fault(error);
                None
            }
        }
    }

    /// Like [`spawn`](Self::spawn), reporting why nothing was spawned.
    ///
    /// # Errors
    ///
    /// `ConfigurationMissing` for an unknown category, `PoolExhausted` for an
    /// empty non-expandable pool, `TemplateMissing` if expansion failed.
    pub fn try_spawn(
        &mut self,
        category: impl Into<Category>,
        placement: impl Into<Placement>,
    ) -> Result<InstanceId, PoolError> {
        let category = category.into();
        let placement = placement.into();

        let pool = self
            .pools
            .get_mut(&category)
            .ok_or(PoolError::ConfigurationMissing(category))?;

        let (index, expanded) = if let Some(index) = pool.idle.pop_front() {
            (index, false)
        } else if pool.config.expandable {
            let template = pool.config.template().unwrap_or_default();
            let mut instance = self
                .factory
                .instantiate(template, category, self.container)
                .ok_or(PoolError::TemplateMissing(category))?;
            instance.reset_to_neutral_pose();
            self.counters.entry(category).or_default().created += 1;
            log::debug!("Pool '{}' expanded, new instance created", category);
            (self.slots.insert(instance), true)
        } else {
            return Err(PoolError::PoolExhausted(category));
        };

        // Idle queues only ever hold idle slots
        let id = self
            .slots
            .activate(index)
            .ok_or(PoolError::PoolExhausted(category))?;
        if let Some(instance) = self.slots.get_mut(id) {
            instance.set_position(placement.position);
            instance.attach(placement.parent);
            instance.set_active(true);
        }

        self.active.insert(id, category);
        self.counters.entry(category).or_default().spawned += 1;
        self.events.record(PoolEvent::Spawned {
            id,
            category,
            expanded,
        });
        Ok(id)
    }

    /// Spawn and recycle unconditionally after `duration` of manager time.
    pub fn spawn_timed(
        &mut self,
        category: impl Into<Category>,
        placement: impl Into<Placement>,
        duration: Duration,
    ) -> Option<InstanceId> {
        let id = self.spawn(category, placement)?;
        self.schedule_recycle(id, duration);
        Some(id)
    }

    /// Spawn and play `animation` on track 0.
    ///
    /// A non-looping animation recycles the instance when it completes.
    /// Looping instances, and instances whose skeleton lacks `animation`,
    /// must be recycled by the caller.
    pub fn spawn_auto_recycle(
        &mut self,
        category: impl Into<Category>,
        placement: impl Into<Placement>,
        animation: &str,
        looping: bool,
    ) -> Option<InstanceId> {
        let id = self.spawn(category, placement)?;
        let handle = self
            .slots
            .get_mut(id)
            .and_then(|instance| instance.set_animation(0, animation, looping));

        match handle {
            Some(handle) if !looping => {
                self.watches.insert(id, handle);
            }
            Some(_) => {}
            None => log::warn!(
                "Instance {} spawned without animation '{}', it will not auto-recycle",
                id,
                animation
            ),
        }
        Some(id)
    }

    /// Recycle `id` after `delay` of manager time, if it is still active
    /// then.
    pub fn schedule_recycle(&mut self, id: InstanceId, delay: Duration) {
        self.timers.schedule(self.time.elapsed() + delay, id);
    }

    // -------------------------------------------------------------------------
    // Recycle
    // -------------------------------------------------------------------------

    /// Return an active instance to its pool.
    ///
    /// `None` is ignored. An id that is not active here (never spawned by
    /// this manager, or already recycled) is logged as a foreign recycle and
    /// nothing is touched.
    pub fn recycle(&mut self, id: impl Into<Option<InstanceId>>) {
        let Some(id) = id.into() else {
            return;
        };
        if let Err(error) = self.try_recycle(id) {
            self.fault(error);
        }
    }

    /// Like [`recycle`](Self::recycle), reporting the outcome.
    ///
    /// Returns `true` if the instance went back to the idle pool and `false`
    /// if the pool was full and it was destroyed.
    ///
    /// # Errors
    ///
    /// `ForeignRecycle` if `id` is not active in this manager.
    pub fn try_recycle(&mut self, id: InstanceId) -> Result<bool, PoolError> {
        let category = self
            .active
            .remove(&id)
            .ok_or(PoolError::ForeignRecycle(id))?;
        self.watches.remove(&id);
        self.timers.cancel_where(|task| *task == id);
        Ok(self.release(id, category))
    }

    fn release(&mut self, id: InstanceId, category: Category) -> bool {
        let Some(index) = self.slots.deactivate(id) else {
            log::error!("Active instance {} missing from storage", id);
            return false;
        };

        let container = self.container;
        if let Some(instance) = self.slots.slot_mut(index) {
            instance.set_active(false);
            instance.attach(Some(container));
            instance.clear_tracks();
            instance.reset_to_neutral_pose();
        }

        let counters = self.counters.entry(category).or_default();
        counters.recycled += 1;

        let pooled = match self.pools.get_mut(&category) {
            Some(pool) if pool.idle.len() < pool.config.max_pool_size => {
                pool.idle.push_back(index);
                true
            }
            _ => {
                if let Some(instance) = self.slots.remove(index) {
                    self.factory.destroy(instance);
                }
                counters.discarded += 1;
                log::debug!("Pool '{}' is full, destroyed recycled instance", category);
                false
            }
        };

        self.events.record(PoolEvent::Recycled {
            id,
            category,
            pooled,
        });
        pooled
    }

    /// Recycle every active instance of both families.
    pub fn recycle_all(&mut self) -> usize {
        let mut ids: Vec<InstanceId> = self.active.keys().copied().collect();
        ids.sort_unstable_by_key(|id| id.index());

        for &id in &ids {
            self.recycle(id);
        }
        if !ids.is_empty() {
            log::info!("Recycled {} active instances", ids.len());
        }
        ids.len()
    }

    /// Destroy an instance this manager never owned.
    pub fn recycle_unmanaged(&mut self, instance: F::Instance) {
        log::warn!("Recycling an instance not created by this pool manager, destroying it");
        self.factory.destroy(instance);
    }

    // -------------------------------------------------------------------------
    // Frame Update
    // -------------------------------------------------------------------------

    /// Advance one frame.
    ///
    /// Makes last frame's events readable, advances every active instance's
    /// animation, recycles instances whose watched animation completed, then
    /// runs due timed recycles.
    pub fn tick(&mut self, delta: Duration) {
        self.events.publish();
        self.time.advance(delta);
        let seconds = self.time.delta_seconds();

        let mut ids: Vec<InstanceId> = self.active.keys().copied().collect();
        ids.sort_unstable_by_key(|id| id.index());

        let mut finished = Vec::new();
        for id in ids {
            let Some(instance) = self.slots.get_mut(id) else {
                continue;
            };
            self.completed.clear();
            instance.update(seconds, &mut self.completed);
            finished.extend(self.completed.iter().map(|&handle| (id, handle)));
        }

        for (id, handle) in finished {
            self.notify_track_complete(id, handle);
        }

        for id in self.timers.drain_due(self.time.elapsed()) {
            self.resume(id);
        }
    }

    /// Report that `handle` finished playing on instance `id`.
    ///
    /// Hosts that advance animation themselves call this; `tick` calls it
    /// for the animation it advances. Completions nobody is watching are
    /// ignored. Such hosts should also empty `events_mut().drain()`
    /// regularly, since only `tick` publishes events.
    pub fn notify_track_complete(&mut self, id: InstanceId, handle: TrackHandle) {
        if self.watches.get(&id) == Some(&handle) {
            self.watches.remove(&id);
            self.resume(id);
        }
    }

    /// Run a deferred recycle for `id`
    fn resume(&mut self, id: InstanceId) {
        if self.active.contains_key(&id) {
            self.recycle(id);
        } else {
            log::debug!("Ignoring stale recycle for {}", id);
            self.events.record(PoolEvent::StaleContinuation { id });
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Check whether a spawn of `category` can succeed
    #[must_use]
    pub fn has_available(&self, category: impl Into<Category>) -> bool {
        self.pools
            .get(&category.into())
            .is_some_and(|pool| !pool.idle.is_empty() || pool.config.expandable)
    }

    /// Check whether `category` has been warmed up
    #[must_use]
    pub fn is_registered(&self, category: impl Into<Category>) -> bool {
        self.pools.contains_key(&category.into())
    }

    /// Statistics snapshot for `category`
    #[must_use]
    pub fn statistics(&self, category: impl Into<Category>) -> Option<PoolStats> {
        let category = category.into();
        let pool = self.pools.get(&category)?;
        let active = self.active.values().filter(|&&c| c == category).count();
        let counters = self.counters.get(&category).copied().unwrap_or_default();
        Some(PoolStats::new(category, pool.idle.len(), active, counters))
    }

    /// Statistics for every registered category
    #[must_use]
    pub fn all_statistics(&self) -> Vec<PoolStats> {
        Category::all()
            .filter_map(|category| self.statistics(category))
            .collect()
    }

    /// Log a statistics table
    pub fn log_statistics(&self) {
        log::info!("{}", format_report(&self.all_statistics()));
    }

    /// Zero every counter.
    ///
    /// Instances active at reset time will still count as recycled later.
    pub fn reset_statistics(&mut self) {
        for counters in self.counters.values_mut() {
            *counters = Counters::default();
        }
        log::info!("Pool statistics reset");
    }

    /// Run an administrative action
    pub fn apply(&mut self, action: AdminAction) {
        match action {
            AdminAction::WarmupAll => {
                self.warmup_all();
            }
            AdminAction::LogStatistics => self.log_statistics(),
            AdminAction::ResetAll => {
                self.recycle_all();
            }
            AdminAction::ResetStatistics => self.reset_statistics(),
        }
    }

    /// Resolve an active instance
    #[must_use]
    pub fn get(&self, id: InstanceId) -> Option<&F::Instance> {
        self.slots.get(id)
    }

    /// Resolve an active instance mutably
    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut F::Instance> {
        self.slots.get_mut(id)
    }

    /// Check whether `id` is active
    #[must_use]
    pub fn is_active(&self, id: InstanceId) -> bool {
        self.active.contains_key(&id)
    }

    /// Category of an active instance
    #[must_use]
    pub fn category_of(&self, id: InstanceId) -> Option<Category> {
        self.active.get(&id).copied()
    }

    /// Number of active instances across all categories
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Idle instances waiting in `category`'s pool
    #[must_use]
    pub fn idle_count(&self, category: impl Into<Category>) -> usize {
        self.pools
            .get(&category.into())
            .map_or(0, |pool| pool.idle.len())
    }

    /// Timed recycles not yet run
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.timers.len()
    }

    /// Manager clock
    #[must_use]
    pub fn time(&self) -> &Time {
        &self.time
    }

    /// Lifecycle events published by the last `tick`.
    ///
    /// The unpublished record is bounded, so a host that never ticks loses
    /// the oldest events rather than growing without limit.
    #[must_use]
    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    /// Lifecycle events, mutably (for draining)
    pub fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    /// Holding container for idle instances
    #[must_use]
    pub fn container(&self) -> Entity {
        self.container
    }

    /// The instance factory
    #[must_use]
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// The instance factory, mutably (for registering templates)
    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    fn fault(&mut self, error: PoolError) {
        match error {
            PoolError::ConfigurationMissing(_) => log::error!("{error}"),
            _ => log::warn!("{error}"),
        }
        self.events.record(PoolEvent::Fault(error));
    }
}

// ============================================================================
// Tests
// ============================================================================
