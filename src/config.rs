//! Pool configuration options

/// What happens when an object that is already free is returned again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DoubleReturnPolicy {
    /// Treat the return as a no-op; waiters are still notified
    #[default]
    Ignore,

    /// Report the return as misuse
    Reject,
}

/// Configuration for pool behavior
///
/// # Examples
///
/// ```
/// use locking_pool::{DoubleReturnPolicy, PoolConfiguration};
///
/// let config = PoolConfiguration::new()
///     .with_name("connections")
///     .with_double_return(DoubleReturnPolicy::Reject)
///     .with_high_utilization_threshold(0.75);
///
/// assert_eq!(config.name, "connections");
/// assert_eq!(config.double_return, DoubleReturnPolicy::Reject);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfiguration {
    /// Name used in log events and exported metric labels
    pub name: String,

    /// Policy applied when a free object is returned
    pub double_return: DoubleReturnPolicy,

    /// Utilization (0.0 to 1.0) above which the pool reports itself unhealthy
    pub high_utilization_threshold: f64,
}

impl Default for PoolConfiguration {
    fn default() -> Self {
        Self {
            name: "pool".to_string(),
            double_return: DoubleReturnPolicy::Ignore,
            high_utilization_threshold: 0.9,
        }
    }
}

impl PoolConfiguration {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pool name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the double return policy
    pub fn with_double_return(mut self, policy: DoubleReturnPolicy) -> Self {
        self.double_return = policy;
        self
    }

    /// Set the utilization threshold used by health checks
    ///
    /// Values are clamped to `0.0..=1.0`.
    pub fn with_high_utilization_threshold(mut self, threshold: f64) -> Self {
        self.high_utilization_threshold = threshold.clamp(0.0, 1.0);
        self
    }
}
