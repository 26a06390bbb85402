use super::*;
use dcyfr_core::{ScannerId, SystemClock};
use dcyfr_queue::QueueConfig;
use dcyfr_registry::fixtures::FixedScanner;
use dcyfr_registry::ScannerRegistry;
use std::sync::Arc as StdArc;
use std::time::Duration as StdDuration;
use tempfile::tempdir;

fn rule(pattern: &str, scanner: &str, debounce_ms: u64) -> WatcherRule {
    WatcherRule::new(pattern, [ScannerId::from(scanner)], Some(debounce_ms)).unwrap()
}

async fn wait_until(mut check: impl FnMut() -> bool, budget: StdDuration) -> bool {
    let deadline = tokio::time::Instant::now() + budget;
    loop {
        if check() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(StdDuration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn matching_file_change_enqueues_a_task() {
    let dir = tempdir().unwrap();
    let registry = ScannerRegistry::new();
    registry.register(StdArc::new(FixedScanner::passing("tlp-headers"))).unwrap();
    let bus = EventBus::new();
    let queue = TaskQueue::new(
        registry,
        bus.clone(),
        SystemClock,
        dir.path(),
        dir.path().join("queue.json"),
        QueueConfig::default(),
    );

    let watcher = FileWatcher::with_system_clock(
        dir.path(),
        vec![rule(r"\.rs$", "tlp-headers", 50)],
        WatcherConfig { default_debounce_ms: 50, ..Default::default() },
        queue.clone(),
        bus,
    );
    watcher.start().unwrap();

    std::fs::write(dir.path().join("main.rs"), b"fn main() {}").unwrap();

    let fired = wait_until(|| queue.size() == 1, StdDuration::from_secs(5)).await;
    assert!(fired, "expected a task to be enqueued after a matching file change");

    watcher.stop();
}

#[tokio::test]
async fn non_matching_file_change_does_not_enqueue() {
    let dir = tempdir().unwrap();
    let registry = ScannerRegistry::new();
    registry.register(StdArc::new(FixedScanner::passing("tlp-headers"))).unwrap();
    let bus = EventBus::new();
    let queue = TaskQueue::new(
        registry,
        bus.clone(),
        SystemClock,
        dir.path(),
        dir.path().join("queue.json"),
        QueueConfig::default(),
    );

    let watcher = FileWatcher::with_system_clock(
        dir.path(),
        vec![rule(r"\.rs$", "tlp-headers", 50)],
        WatcherConfig { default_debounce_ms: 50, ..Default::default() },
        queue.clone(),
        bus,
    );
    watcher.start().unwrap();

    std::fs::write(dir.path().join("notes.txt"), b"irrelevant").unwrap();
    tokio::time::sleep(StdDuration::from_millis(500)).await;

    assert_eq!(queue.size(), 0);
    watcher.stop();
}

#[tokio::test]
async fn rapid_writes_coalesce_into_a_single_batch() {
    let dir = tempdir().unwrap();
    let registry = ScannerRegistry::new();
    registry.register(StdArc::new(FixedScanner::passing("tlp-headers"))).unwrap();
    let bus = EventBus::new();
    let queue = TaskQueue::new(
        registry,
        bus.clone(),
        SystemClock,
        dir.path(),
        dir.path().join("queue.json"),
        QueueConfig::default(),
    );

    let watcher = FileWatcher::with_system_clock(
        dir.path(),
        vec![rule(r"\.rs$", "tlp-headers", 200)],
        WatcherConfig { default_debounce_ms: 200, ..Default::default() },
        queue.clone(),
        bus,
    );
    watcher.start().unwrap();

    for i in 0..5 {
        std::fs::write(dir.path().join("main.rs"), format!("fn main() {{ {i} }}")).unwrap();
        tokio::time::sleep(StdDuration::from_millis(30)).await;
    }

    let fired = wait_until(|| queue.size() == 1, StdDuration::from_secs(5)).await;
    assert!(fired, "rapid writes within the debounce window should coalesce into one task");

    watcher.stop();
}

#[tokio::test]
async fn ignored_state_directory_is_never_matched() {
    let dir = tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join(".dcyfr")).unwrap();
    let registry = ScannerRegistry::new();
    registry.register(StdArc::new(FixedScanner::passing("tlp-headers"))).unwrap();
    let bus = EventBus::new();
    let queue = TaskQueue::new(
        registry,
        bus.clone(),
        SystemClock,
        dir.path(),
        dir.path().join("queue.json"),
        QueueConfig::default(),
    );

    let watcher = FileWatcher::with_system_clock(
        dir.path(),
        vec![rule(r".*", "tlp-headers", 50)],
        WatcherConfig { default_debounce_ms: 50, ..Default::default() },
        queue.clone(),
        bus,
    );
    watcher.start().unwrap();

    std::fs::write(dir.path().join(".dcyfr").join("queue.json"), b"{}").unwrap();
    tokio::time::sleep(StdDuration::from_millis(400)).await;

    assert_eq!(queue.size(), 0);
    watcher.stop();
}
