//! Core locking pool implementation

use crate::config::{DoubleReturnPolicy, PoolConfiguration};
use crate::errors::{PoolError, PoolResult};
use crate::health::HealthStatus;
use crate::metrics::{MetricsExporter, MetricsTracker, PoolMetrics};

use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::ops::Deref;
use std::sync::atomic::Ordering;
use tracing::{debug, error, trace, warn};

/// Checkout state guarded by the pool mutex
struct PoolState<T> {
    /// Object -> in use
    objects: HashMap<T, bool>,
    active: usize,
}

impl<T: Eq + Hash + Clone> PoolState<T> {
    fn claim(&mut self) -> Option<T> {
        let obj = self
            .objects
            .iter_mut()
            .find(|(_, in_use)| !**in_use)
            .map(|(obj, in_use)| {
                *in_use = true;
                obj.clone()
            })?;
        self.active += 1;
        Some(obj)
    }
}

/// An object checked out through [`ObjectPool::lease`], returned to the pool when dropped
///
/// The guard only hands out shared access: the value is the object's
/// identity in the pool, so it cannot be changed while checked out.
///
/// ```compile_fail
/// use locking_pool::ObjectPool;
///
/// let pool = ObjectPool::new(vec![1]);
/// let mut lease = pool.lease();
/// *lease = 2;
/// ```
pub struct PooledObject<'a, T: Eq + Hash + Clone> {
    value: Option<T>,
    pool: &'a ObjectPool<T>,
}

impl<'a, T: Eq + Hash + Clone> PooledObject<'a, T> {
    fn new(value: T, pool: &'a ObjectPool<T>) -> Self {
        Self {
            value: Some(value),
            pool,
        }
    }

    /// Take the object out of the guard without returning it
    ///
    /// The object stays checked out until it is handed to
    /// [`ObjectPool::return_object`].
    pub fn detach(mut self) -> T {
        self.value.take().expect("Value already taken")
    }
}

impl<T: Eq + Hash + Clone> Deref for PooledObject<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.value.as_ref().expect("Value already taken")
    }
}

impl<T: Eq + Hash + Clone> Drop for PooledObject<'_, T> {
    /// # Panics
    ///
    /// Panics if the pool rejects the return, unless the thread is already
    /// unwinding.
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            if let Err(err) = self.pool.try_return_object(value) {
                if !std::thread::panicking() {
                    panic!("{err}");
                }
            }
        }
    }
}

/// Thread-safe pool over a fixed set of objects
///
/// Objects are tracked by identity: each distinct value is one pool entry,
/// and duplicates passed at construction collapse into one. All checkout
/// state lives behind a single mutex, and blocked callers of
/// [`get_object`](Self::get_object) wait on a condition variable bound to
/// that same mutex, so a return can never slip between "nothing free" and
/// "start waiting".
///
/// # Examples
///
/// ```
/// use locking_pool::ObjectPool;
///
/// let pool = ObjectPool::new(vec![1]);
///
/// let obj = pool.get_object();
/// assert_eq!(obj, 1);
/// assert_eq!(pool.try_get_object(), None);
///
/// pool.return_object(obj);
/// assert_eq!(pool.try_get_object(), Some(1));
/// ```
pub struct ObjectPool<T> {
    state: Mutex<PoolState<T>>,
    available: Condvar,
    config: PoolConfiguration,
    metrics: MetricsTracker,
    capacity: usize,
}

impl<T: Eq + Hash + Clone> ObjectPool<T> {
    /// Create a pool with default configuration, all objects free
    ///
    /// # Panics
    ///
    /// Panics if `objects` is empty.
    pub fn new(objects: Vec<T>) -> Self {
        Self::with_config(objects, PoolConfiguration::default()).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Create a pool with the given configuration, all objects free
    ///
    /// # Examples
    ///
    /// ```
    /// use locking_pool::{ObjectPool, PoolConfiguration, PoolError};
    ///
    /// let result = ObjectPool::<u32>::with_config(Vec::new(), PoolConfiguration::default());
    /// assert_eq!(result.err(), Some(PoolError::EmptyPool));
    /// ```
    pub fn with_config(objects: Vec<T>, config: PoolConfiguration) -> PoolResult<Self> {
        if objects.is_empty() {
            error!(pool = %config.name, "refusing to create a pool without objects");
            return Err(PoolError::EmptyPool);
        }

        let supplied = objects.len();
        let objects: HashMap<T, bool> = objects.into_iter().map(|obj| (obj, false)).collect();
        let capacity = objects.len();

        debug!(
            pool = %config.name,
            capacity,
            collapsed = supplied - capacity,
            "created pool"
        );

        Ok(Self {
            state: Mutex::new(PoolState { objects, active: 0 }),
            available: Condvar::new(),
            config,
            metrics: MetricsTracker::new(),
            capacity,
        })
    }

    /// Check out a free object without blocking
    ///
    /// Returns `None` immediately when every object is in use. Which free
    /// object is handed out is unspecified.
    pub fn try_get_object(&self) -> Option<T> {
        let claimed = self.state.lock().claim();
        match claimed {
            Some(obj) => {
                self.record_retrieved();
                Some(obj)
            }
            None => {
                self.metrics.pool_empty_events.fetch_add(1, Ordering::Relaxed);
                trace!(pool = %self.config.name, "no free object");
                None
            }
        }
    }

    /// Check out an object, blocking until one is free
    ///
    /// There is no timeout: if nothing is ever returned, this never returns.
    /// Waiters are not served in any particular order.
    pub fn get_object(&self) -> T {
        let mut state = self.state.lock();
        loop {
            if let Some(obj) = state.claim() {
                drop(state);
                self.record_retrieved();
                return obj;
            }

            self.metrics.wait_events.fetch_add(1, Ordering::Relaxed);
            trace!(pool = %self.config.name, "waiting for a free object");
            // Woken waiters race for the freed object; losers loop back here.
            self.available.wait(&mut state);
        }
    }

    /// Return a checked-out object to the pool
    ///
    /// # Panics
    ///
    /// Panics if `obj` was never part of the pool, or if it is already free
    /// and the pool uses [`DoubleReturnPolicy::Reject`].
    pub fn return_object(&self, obj: T) {
        if let Err(err) = self.try_return_object(obj) {
            panic!("{err}");
        }
    }

    /// Return a checked-out object, reporting misuse as an error
    ///
    /// # Examples
    ///
    /// ```
    /// use locking_pool::{ObjectPool, PoolError};
    ///
    /// let pool = ObjectPool::new(vec!["a", "b"]);
    /// assert_eq!(pool.try_return_object("z"), Err(PoolError::UnownedObject));
    /// ```
    pub fn try_return_object(&self, obj: T) -> PoolResult<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let Some(in_use) = state.objects.get_mut(&obj) else {
            error!(pool = %self.config.name, "attempt to return unowned object");
            return Err(PoolError::UnownedObject);
        };

        if *in_use {
            *in_use = false;
            state.active -= 1;
            self.metrics.total_returned.fetch_add(1, Ordering::Relaxed);
            trace!(pool = %self.config.name, active = state.active, "object returned");
        } else {
            self.metrics.double_returns.fetch_add(1, Ordering::Relaxed);
            match self.config.double_return {
                DoubleReturnPolicy::Reject => {
                    error!(pool = %self.config.name, "object returned twice");
                    return Err(PoolError::AlreadyReturned);
                }
                DoubleReturnPolicy::Ignore => {
                    warn!(pool = %self.config.name, "object returned while already free");
                }
            }
        }

        self.available.notify_one();
        Ok(())
    }

    /// Check out an object, blocking until one is free, wrapped in a guard
    /// that returns it on drop
    ///
    /// # Examples
    ///
    /// ```
    /// use locking_pool::ObjectPool;
    ///
    /// let pool = ObjectPool::new(vec![7]);
    /// {
    ///     let obj = pool.lease();
    ///     assert_eq!(*obj, 7);
    ///     assert!(pool.try_lease().is_none());
    /// }
    /// assert_eq!(pool.available_count(), 1);
    /// ```
    pub fn lease(&self) -> PooledObject<'_, T> {
        PooledObject::new(self.get_object(), self)
    }

    /// Non-blocking variant of [`lease`](Self::lease)
    pub fn try_lease(&self) -> Option<PooledObject<'_, T>> {
        self.try_get_object().map(|obj| PooledObject::new(obj, self))
    }

    /// Whether `obj` is checked out; `None` if the pool does not track it
    pub fn is_in_use(&self, obj: &T) -> Option<bool> {
        self.state.lock().objects.get(obj).copied()
    }

    /// Number of tracked objects
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get available count
    pub fn available_count(&self) -> usize {
        self.capacity - self.active_count()
    }

    /// Get active count
    pub fn active_count(&self) -> usize {
        self.state.lock().active
    }

    /// Get the pool configuration
    pub fn config(&self) -> &PoolConfiguration {
        &self.config
    }

    /// Get health status
    pub fn get_health_status(&self) -> HealthStatus {
        HealthStatus::new(
            self.active_count(),
            self.capacity,
            self.config.high_utilization_threshold,
        )
    }

    /// Get pool metrics
    pub fn get_metrics(&self) -> PoolMetrics {
        self.metrics.get_metrics(self.active_count(), self.capacity)
    }

    /// Export metrics
    pub fn export_metrics(&self) -> HashMap<String, String> {
        self.get_metrics().export()
    }

    /// Export metrics in Prometheus format, labelled with the pool name
    pub fn export_metrics_prometheus(&self, tags: Option<&HashMap<String, String>>) -> String {
        MetricsExporter::export_prometheus(&self.get_metrics(), &self.config.name, tags)
    }

    fn record_retrieved(&self) {
        self.metrics.total_retrieved.fetch_add(1, Ordering::Relaxed);
        trace!(pool = %self.config.name, "object checked out");
    }
}

impl<T> fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("name", &self.config.name)
            .field("capacity", &self.capacity)
            .field("active", &self.state.lock().active)
            .finish()
    }
}
