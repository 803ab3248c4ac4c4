use crossbeam::channel::{bounded, unbounded};
use locking_pool::ObjectPool;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Run `f` on its own thread and fail if it does not finish in time.
fn with_timeout<F>(timeout: Duration, f: F)
where
    F: FnOnce() + Send + 'static,
{
    let (done_tx, done_rx) = bounded(1);
    let handle = thread::spawn(move || {
        f();
        let _ = done_tx.send(());
    });

    if done_rx.recv_timeout(timeout).is_err() {
        panic!("function did not return under {:?}", timeout);
    }
    handle.join().unwrap();
}

/// Block until `count` callers of `get_object` have gone to sleep.
fn wait_for_waiters<T: Eq + Hash + Clone>(pool: &ObjectPool<T>, count: usize) {
    while pool.get_metrics().wait_events < count {
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn try_get_fails_while_held_elsewhere() {
    let pool = Arc::new(ObjectPool::new(vec![1]));
    let (obtained_tx, obtained_rx) = bounded(0);
    let (release_tx, release_rx) = bounded::<()>(0);

    let holder = {
        let pool = Arc::clone(&pool);
        thread::spawn(move || {
            let obj = pool.get_object();
            obtained_tx.send(()).unwrap();
            release_rx.recv().unwrap();
            pool.return_object(obj);
        })
    };

    obtained_rx.recv().unwrap();
    assert_eq!(pool.try_get_object(), None);

    release_tx.send(()).unwrap();
    holder.join().unwrap();

    assert_eq!(pool.try_get_object(), Some(1));
    pool.return_object(1);
}

#[test]
fn blocked_get_is_released_by_return() {
    with_timeout(Duration::from_secs(5), || {
        let pool = Arc::new(ObjectPool::new(vec![1]));
        let held = pool.get_object();

        let waiter = {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                let obj = pool.get_object();
                pool.return_object(obj);
                obj
            })
        };

        wait_for_waiters(&*pool, 1);
        assert_eq!(pool.is_in_use(&1), Some(true));
        pool.return_object(held);

        assert_eq!(waiter.join().unwrap(), 1);
        assert_eq!(pool.available_count(), 1);
    });
}

#[test]
fn every_waiter_is_eventually_served() {
    with_timeout(Duration::from_secs(10), || {
        let pool = Arc::new(ObjectPool::new(vec![0, 1]));
        let (served_tx, served_rx) = unbounded();

        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let pool = Arc::clone(&pool);
                let served_tx = served_tx.clone();
                thread::spawn(move || {
                    let obj = pool.get_object();
                    thread::sleep(Duration::from_millis(5));
                    pool.return_object(obj);
                    served_tx.send(worker).unwrap();
                })
            })
            .collect();
        drop(served_tx);

        for worker in workers {
            worker.join().unwrap();
        }

        let mut served: Vec<_> = served_rx.iter().collect();
        served.sort();
        assert_eq!(served, (0..8).collect::<Vec<_>>());
        assert_eq!(pool.available_count(), 2);
    });
}

#[test]
fn objects_are_never_shared() {
    const OBJECTS: usize = 4;
    const THREADS: usize = 16;
    const ROUNDS: usize = 500;

    let pool = ObjectPool::new((0..OBJECTS).collect::<Vec<usize>>());
    let held: Vec<AtomicBool> = (0..OBJECTS).map(|_| AtomicBool::new(false)).collect();
    let in_use = AtomicUsize::new(0);
    let peak = AtomicUsize::new(0);

    thread::scope(|s| {
        for worker in 0..THREADS {
            let (pool, held, in_use, peak) = (&pool, &held, &in_use, &peak);
            s.spawn(move || {
                for round in 0..ROUNDS {
                    let obj = if (worker + round) % 2 == 0 {
                        pool.get_object()
                    } else {
                        match pool.try_get_object() {
                            Some(obj) => obj,
                            None => continue,
                        }
                    };

                    assert!(
                        !held[obj].swap(true, Ordering::SeqCst),
                        "object {} handed out twice",
                        obj
                    );
                    let now = in_use.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);

                    thread::yield_now();

                    in_use.fetch_sub(1, Ordering::SeqCst);
                    held[obj].store(false, Ordering::SeqCst);
                    pool.return_object(obj);
                }
            });
        }
    });

    assert!(peak.load(Ordering::SeqCst) <= OBJECTS);
    assert_eq!(pool.active_count(), 0);

    let metrics = pool.get_metrics();
    assert_eq!(metrics.total_retrieved, metrics.total_returned);
    assert_eq!(metrics.double_returns, 0);
}

#[test]
fn leases_hand_off_between_threads() {
    with_timeout(Duration::from_secs(5), || {
        let pool = Arc::new(ObjectPool::new(vec!["only"]));
        let lease = pool.lease();

        let waiter = {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                let lease = pool.lease();
                let value = *lease;
                value
            })
        };

        wait_for_waiters(&*pool, 1);
        drop(lease);
        assert_eq!(waiter.join().unwrap(), "only");
        assert_eq!(pool.available_count(), 1);
    });
}
