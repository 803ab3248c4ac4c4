//! Metrics collection and export for locking pools

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Metrics snapshot for a pool
///
/// # Examples
///
/// ```
/// use locking_pool::ObjectPool;
///
/// let pool = ObjectPool::new(vec![1, 2, 3]);
///
/// let obj = pool.get_object();
/// let metrics = pool.get_metrics();
/// assert_eq!(metrics.total_retrieved, 1);
/// assert_eq!(metrics.active_objects, 1);
/// pool.return_object(obj);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PoolMetrics {
    /// Total objects checked out
    pub total_retrieved: usize,

    /// Total objects returned
    pub total_returned: usize,

    /// Current checked-out objects
    pub active_objects: usize,

    /// Current free objects
    pub available_objects: usize,

    /// Number of non-blocking acquisitions that found nothing free
    pub pool_empty_events: usize,

    /// Number of times a blocking acquisition had to wait
    pub wait_events: usize,

    /// Returns of objects that were already free
    pub double_returns: usize,

    /// Pool utilization ratio (0.0 to 1.0)
    pub utilization: f64,

    /// Number of tracked objects
    pub max_capacity: usize,
}

impl PoolMetrics {
    /// Export metrics as a HashMap
    pub fn export(&self) -> HashMap<String, String> {
        let mut metrics = HashMap::new();
        metrics.insert("total_retrieved".to_string(), self.total_retrieved.to_string());
        metrics.insert("total_returned".to_string(), self.total_returned.to_string());
        metrics.insert("active_objects".to_string(), self.active_objects.to_string());
        metrics.insert("available_objects".to_string(), self.available_objects.to_string());
        metrics.insert("pool_empty_events".to_string(), self.pool_empty_events.to_string());
        metrics.insert("wait_events".to_string(), self.wait_events.to_string());
        metrics.insert("double_returns".to_string(), self.double_returns.to_string());
        metrics.insert("utilization".to_string(), format!("{:.2}", self.utilization));
        metrics.insert("max_capacity".to_string(), self.max_capacity.to_string());
        metrics
    }
}

/// Metrics exporter for Prometheus format
pub struct MetricsExporter;

impl MetricsExporter {
    /// Export metrics in Prometheus exposition format
    ///
    /// Tag labels are emitted in key order after the `pool` label.
    ///
    /// # Examples
    ///
    /// ```
    /// use locking_pool::ObjectPool;
    /// use std::collections::HashMap;
    ///
    /// let pool = ObjectPool::new(vec![1, 2, 3]);
    ///
    /// let mut tags = HashMap::new();
    /// tags.insert("service".to_string(), "api".to_string());
    ///
    /// let output = pool.export_metrics_prometheus(Some(&tags));
    /// assert!(output.contains("lockingpool_objects_active"));
    /// assert!(output.contains("service=\"api\""));
    /// ```
    pub fn export_prometheus(
        metrics: &PoolMetrics,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        let labels = Self::format_labels(pool_name, tags);
        let utilization = format!("{:.2}", metrics.utilization);

        let series: [(&str, &str, &str, String); 8] = [
            ("objects_active", "gauge", "Current checked-out objects", metrics.active_objects.to_string()),
            ("objects_available", "gauge", "Current free objects", metrics.available_objects.to_string()),
            ("utilization", "gauge", "Pool utilization ratio", utilization),
            ("objects_retrieved_total", "counter", "Total objects checked out", metrics.total_retrieved.to_string()),
            ("objects_returned_total", "counter", "Total objects returned", metrics.total_returned.to_string()),
            ("events_empty_total", "counter", "Non-blocking acquisitions that found the pool empty", metrics.pool_empty_events.to_string()),
            ("events_wait_total", "counter", "Blocking acquisitions that had to wait", metrics.wait_events.to_string()),
            ("double_returns_total", "counter", "Returns of objects that were already free", metrics.double_returns.to_string()),
        ];

        let mut output = String::new();
        for (name, kind, help, value) in series {
            output.push_str(&format!("# HELP lockingpool_{} {}\n", name, help));
            output.push_str(&format!("# TYPE lockingpool_{} {}\n", name, kind));
            output.push_str(&format!("lockingpool_{}{{{}}} {}\n", name, labels, value));
        }
        output
    }

    fn format_labels(pool_name: &str, tags: Option<&HashMap<String, String>>) -> String {
        let mut labels = vec![format!("pool=\"{}\"", pool_name)];

        if let Some(tags) = tags {
            let mut sorted: Vec<_> = tags.iter().collect();
            sorted.sort();
            for (key, value) in sorted {
                labels.push(format!("{}=\"{}\"", key, value));
            }
        }

        labels.join(",")
    }
}

/// Internal metrics tracker
#[derive(Default)]
pub(crate) struct MetricsTracker {
    pub total_retrieved: AtomicUsize,
    pub total_returned: AtomicUsize,
    pub pool_empty_events: AtomicUsize,
    pub wait_events: AtomicUsize,
    pub double_returns: AtomicUsize,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_metrics(&self, active: usize, capacity: usize) -> PoolMetrics {
        let utilization = if capacity > 0 {
            active as f64 / capacity as f64
        } else {
            0.0
        };

        PoolMetrics {
            total_retrieved: self.total_retrieved.load(Ordering::Relaxed),
            total_returned: self.total_returned.load(Ordering::Relaxed),
            active_objects: active,
            available_objects: capacity - active,
            pool_empty_events: self.pool_empty_events.load(Ordering::Relaxed),
            wait_events: self.wait_events.load(Ordering::Relaxed),
            double_returns: self.double_returns.load(Ordering::Relaxed),
            utilization,
            max_capacity: capacity,
        }
    }
}
