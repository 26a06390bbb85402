use super::*;
use dcyfr_core::{Priority, TaskSource};
use std::collections::HashMap;
use std::time::Duration;

fn task(scanner: &str, priority: Priority, created_at: DateTime<Utc>) -> Task {
    Task::new(ScannerId::from(scanner), priority, TaskSource::Cli, None, HashMap::new(), created_at)
}

#[test]
fn duplicate_detection_matches_queued_same_scope() {
    let mut state = QueueState::default();
    let now = Utc::now();
    state.enqueue(task("a", Priority::Normal, now));
    assert!(state.is_duplicate(&ScannerId::from("a"), &None));
    assert!(!state.is_duplicate(&ScannerId::from("b"), &None));
}

#[test]
fn duplicate_detection_matches_running_same_scope() {
    let mut state = QueueState::default();
    let now = Utc::now();
    state.mark_running(task("a", Priority::Normal, now));
    assert!(state.is_duplicate(&ScannerId::from("a"), &None));
}

#[test]
fn pop_next_eligible_runs_critical_before_high_before_normal() {
    let mut state = QueueState::default();
    let now = Utc::now();
    state.enqueue(task("a", Priority::Normal, now));
    state.enqueue(task("b", Priority::High, now));
    state.enqueue(task("c", Priority::Critical, now));
    assert_eq!(state.pop_next_eligible().unwrap().scanner.as_str(), "c");
    assert_eq!(state.pop_next_eligible().unwrap().scanner.as_str(), "b");
    assert_eq!(state.pop_next_eligible().unwrap().scanner.as_str(), "a");
}

#[test]
fn pop_next_eligible_is_fifo_within_same_priority() {
    let mut state = QueueState::default();
    let now = Utc::now();
    state.enqueue(task("first", Priority::Normal, now));
    state.enqueue(task("second", Priority::Normal, now + chrono::Duration::seconds(1)));
    assert_eq!(state.pop_next_eligible().unwrap().scanner.as_str(), "first");
}

#[test]
fn pop_next_eligible_skips_scanners_already_running() {
    let mut state = QueueState::default();
    let now = Utc::now();
    state.mark_running(task("a", Priority::Critical, now));
    state.enqueue(task("a", Priority::Critical, now));
    state.enqueue(task("b", Priority::Low, now));
    let next = state.pop_next_eligible().unwrap();
    assert_eq!(next.scanner.as_str(), "b");
}

#[test]
fn expire_stale_removes_tasks_past_ttl() {
    let mut state = QueueState::default();
    let now = Utc::now();
    let old = now - chrono::Duration::hours(2);
    state.enqueue(task("a", Priority::Normal, old));
    state.enqueue(task("b", Priority::Normal, now));
    let expired = state.expire_stale(now, Duration::from_secs(3600));
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].scanner.as_str(), "a");
    assert_eq!(state.queued.len(), 1);
}

#[test]
fn history_is_trimmed_once_it_exceeds_the_cap() {
    let mut state = QueueState::default();
    let now = Utc::now();
    for i in 0..120 {
        let mut t = task(&format!("s{i}"), Priority::Normal, now);
        t.status = TaskStatus::Completed;
        state.push_history(t);
    }
    assert_eq!(state.history.len(), HISTORY_TRIM_TO);
}

#[test]
fn stats_count_terminal_statuses_from_history() {
    let mut state = QueueState::default();
    let now = Utc::now();
    let mut completed = task("a", Priority::Normal, now);
    completed.status = TaskStatus::Completed;
    let mut failed = task("b", Priority::Normal, now);
    failed.status = TaskStatus::Failed;
    state.push_history(completed);
    state.push_history(failed);
    state.enqueue(task("c", Priority::Normal, now));
    let stats = state.stats();
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.queued, 1);
}
