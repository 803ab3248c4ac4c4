//! # locking_pool
//!
//! A fixed-size, thread-safe checkout pool. A pool is created once from a
//! non-empty set of distinguishable objects; callers check one out for
//! exclusive use and hand it back afterwards.
//!
//! ## Features
//!
//! - Blocking checkout that sleeps on a condition variable until an object is returned
//! - Non-blocking checkout that fails fast when everything is in use
//! - Validated returns: handing back an object the pool never owned is misuse
//! - RAII leases that return objects automatically when dropped
//! - Health status, metrics and Prometheus export
//! - Structured logging through `tracing`
//!
//! ## Quick Start
//!
//! ```rust
//! use locking_pool::ObjectPool;
//!
//! let pool = ObjectPool::new(vec![1, 2, 3]);
//!
//! let obj = pool.get_object();
//! println!("Got: {}", obj);
//! pool.return_object(obj);
//!
//! {
//!     let obj = pool.lease();
//!     println!("Leased: {}", *obj);
//!     // Object automatically returned when `obj` goes out of scope
//! }
//! assert_eq!(pool.available_count(), 3);
//! ```

mod pool;
mod config;
mod metrics;
mod health;
mod errors;

pub use pool::{ObjectPool, PooledObject};
pub use config::{DoubleReturnPolicy, PoolConfiguration};
pub use metrics::{PoolMetrics, MetricsExporter};
pub use health::HealthStatus;
pub use errors::{PoolError, PoolResult};
