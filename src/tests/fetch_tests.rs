use std::time::{Duration, Instant};

use crate::scraper::fetch::{FetchSettings, HttpFetcher, Throttle};

#[test]
fn throttle_spaces_consecutive_requests() {
    let throttle = Throttle::new(Duration::from_millis(20));
    let start = Instant::now();

    for _ in 0..3 {
        throttle.wait();
    }

    // First slot is immediate, the next two wait one spacing each.
    assert!(start.elapsed() >= Duration::from_millis(40));
}

#[test]
fn throttle_is_shared_across_threads() {
    let throttle = Throttle::new(Duration::from_millis(15));
    let start = Instant::now();

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| throttle.wait());
        }
    });

    assert!(start.elapsed() >= Duration::from_millis(45));
}

#[test]
fn http_fetcher_builds_with_defaults() {
    assert!(HttpFetcher::new(FetchSettings::default()).is_ok());
}
