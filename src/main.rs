// Binary wrapper around the library - run the demo with:
// cargo run --example basic

use locking_pool::ObjectPool;
use std::thread;

fn main() {
    println!("=== locking_pool ===");
    println!("Run: cargo run --example basic");
    println!();

    println!("Quick Demo:");
    let pool = ObjectPool::new(vec!["alpha", "beta"]);

    thread::scope(|s| {
        for worker in 0..4 {
            let pool = &pool;
            s.spawn(move || {
                let obj = pool.get_object();
                println!("  worker {} got {}", worker, obj);
                pool.return_object(obj);
            });
        }
    });

    println!("  Available after return: {}", pool.available_count());
}
