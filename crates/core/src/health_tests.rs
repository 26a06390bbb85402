use super::*;
use proptest::prelude::*;

#[yare::parameterized(
    healthy_floor    = { 90.0, HealthStatus::Healthy },
    healthy_high     = { 100.0, HealthStatus::Healthy },
    degraded_floor   = { 70.0, HealthStatus::Degraded },
    degraded_ceiling = { 89.9, HealthStatus::Degraded },
    critical_ceiling = { 69.9, HealthStatus::Critical },
    critical_floor   = { 0.0, HealthStatus::Critical },
)]
fn classify_score_boundaries(score: f64, expected: HealthStatus) {
    assert_eq!(HealthStatus::classify(score), expected);
}

fn status_rank(status: HealthStatus) -> u8 {
    match status {
        HealthStatus::Critical => 0,
        HealthStatus::Degraded => 1,
        HealthStatus::Healthy => 2,
    }
}

proptest! {
    /// A higher score never classifies to a worse status (spec §4.7's
    /// thresholds are monotonic, not just pointwise-correct).
    #[test]
    fn classify_is_monotonic(a in 0.0f64..150.0, b in 0.0f64..150.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(status_rank(HealthStatus::classify(lo)) <= status_rank(HealthStatus::classify(hi)));
    }
}

#[test]
fn snapshot_round_trips_through_json() {
    let mut scanners = HashMap::new();
    scanners.insert(
        ScannerId::from("license-headers"),
        ScannerHealth {
            score: Some(100.0),
            status: Some(HealthStatus::Healthy),
            last_run: Utc::now(),
            violations_count: 0,
            warnings_count: 0,
            metrics: HashMap::new(),
            summary: "ok".to_string(),
        },
    );
    let snapshot = HealthSnapshot {
        timestamp: Utc::now(),
        overall: OverallHealth { score: 100.0, status: HealthStatus::Healthy },
        scanners,
        workspace: WorkspaceHealth { packages: 3, last_scan_duration_ms: 120 },
    };
    let json = serde_json::to_string(&snapshot).unwrap();
    let back: HealthSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.overall.score, snapshot.overall.score);
    assert_eq!(back.scanners.len(), 1);
}
