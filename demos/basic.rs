//! Basic usage examples for ObjectPool

use locking_pool::{DoubleReturnPolicy, ObjectPool, PoolConfiguration, PoolError};
use std::thread;
use std::time::Duration;

fn main() {
    println!("=== locking_pool - Basic Examples ===\n");

    // Example 1: Get and return
    simple_pool();

    // Example 2: Try methods
    try_methods();

    // Example 3: Blocking hand-off between threads
    blocking_handoff();

    // Example 4: Misuse reporting
    misuse();

    // Example 5: Metrics and health
    metrics_and_health();
}

fn simple_pool() {
    println!("1. Simple Pool:");
    let pool = ObjectPool::new(vec![1, 2, 3]);

    let obj = pool.get_object();
    println!("   Got object: {}", obj);
    pool.return_object(obj);

    {
        let leased = pool.lease();
        println!("   Leased object: {}", *leased);
        // Returned when dropped
    }

    println!("   Available after return: {}\n", pool.available_count());
}

fn try_methods() {
    println!("2. Try Methods:");
    let pool = ObjectPool::new(vec![42]);

    let obj = pool.try_get_object();
    assert!(obj.is_some());
    println!("   First try: Success");

    assert!(pool.try_get_object().is_none());
    println!("   Second try: None (everything checked out)");

    pool.return_object(42);

    assert_eq!(pool.try_get_object(), Some(42));
    println!("   Third try: Success\n");
}

fn blocking_handoff() {
    println!("3. Blocking Hand-off:");
    let pool = ObjectPool::new(vec!["connection"]);
    let held = pool.get_object();

    thread::scope(|s| {
        let waiter = s.spawn(|| {
            let obj = pool.get_object();
            pool.return_object(obj);
            obj
        });

        thread::sleep(Duration::from_millis(50));
        println!("   Returning {} to unblock the waiter", held);
        pool.return_object(held);

        println!("   Waiter got: {}\n", waiter.join().unwrap());
    });
}

fn misuse() {
    println!("4. Misuse Reporting:");

    let empty = ObjectPool::<u8>::with_config(Vec::new(), PoolConfiguration::default());
    println!("   Empty pool: {:?}", empty.err());

    let config = PoolConfiguration::new()
        .with_name("strict")
        .with_double_return(DoubleReturnPolicy::Reject);
    let pool = match ObjectPool::with_config(vec![1, 2], config) {
        Ok(pool) => pool,
        Err(err) => {
            println!("   Unexpected: {}", err);
            return;
        }
    };

    let result: Result<(), PoolError> = pool.try_return_object(99);
    println!("   Unowned return: {:?}", result);
    println!("   Double return: {:?}\n", pool.try_return_object(1));
}

fn metrics_and_health() {
    println!("5. Metrics and Health:");
    let pool = ObjectPool::new(vec![1, 2, 3, 4, 5]);

    {
        let _obj1 = pool.lease();
        let _obj2 = pool.lease();

        let health = pool.get_health_status();
        println!("   Health: {}", if health.is_healthy { "Healthy" } else { "Unhealthy" });
        println!("   Utilization: {:.1}%", health.utilization * 100.0);
        println!("   Active: {}, Available: {}", health.active_objects, health.available_objects);
    }

    let metrics = pool.export_metrics();
    println!("\n   Metrics:");
    for (key, value) in metrics {
        println!("     {}: {}", key, value);
    }

    println!("\n{}", pool.export_metrics_prometheus(None));
}
