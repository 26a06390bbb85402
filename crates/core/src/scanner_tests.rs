use super::*;
use crate::context::ScanContext;
use crate::result::{ScanResult, Status};
use chrono::Utc;

struct AlwaysPass {
    projects: Option<Vec<String>>,
}

#[async_trait]
impl Scanner for AlwaysPass {
    fn id(&self) -> ScannerId {
        ScannerId::from("always-pass")
    }
    fn name(&self) -> &str {
        "Always Pass"
    }
    fn description(&self) -> &str {
        "test fixture"
    }
    fn category(&self) -> Category {
        Category::Testing
    }
    fn projects(&self) -> Option<&[String]> {
        self.projects.as_deref()
    }
    async fn scan(&self, _ctx: &ScanContext) -> ScanResult {
        ScanResult {
            scanner: self.id(),
            status: Status::Pass,
            violations: vec![],
            warnings: vec![],
            metrics: Default::default(),
            duration_ms: 0,
            timestamp: Utc::now(),
            summary: "ok".to_string(),
        }
    }
}

#[yare::parameterized(
    unscoped_named_project   = { None, Some("frontend"), true },
    unscoped_no_project      = { None, None, true },
    scoped_matching_project  = { Some(vec!["backend"]), Some("backend"), true },
    scoped_other_project     = { Some(vec!["backend"]), Some("frontend"), false },
    // absent project means "full scan", not scoped to one project
    scoped_no_project        = { Some(vec!["backend"]), None, true },
)]
fn applies_to(projects: Option<Vec<&str>>, queried: Option<&str>, expected: bool) {
    let s = AlwaysPass { projects: projects.map(|p| p.into_iter().map(String::from).collect()) };
    assert_eq!(s.applies_to(queried), expected);
}

#[tokio::test]
async fn scan_is_invokable_and_reentrant() {
    let s = AlwaysPass { projects: None };
    let ctx = ScanContext::new("/workspace");
    let a = s.scan(&ctx);
    let b = s.scan(&ctx);
    let (ra, rb) = tokio::join!(a, b);
    assert_eq!(ra.status, Status::Pass);
    assert_eq!(rb.status, Status::Pass);
}

#[test]
fn sorted_ids_deduplicates_and_orders() {
    let a = ScannerId::from("b-scanner");
    let b = ScannerId::from("a-scanner");
    let c = ScannerId::from("a-scanner");
    let set = sorted_ids([&a, &b, &c]);
    let v: Vec<_> = set.into_iter().map(|i| i.to_string()).collect();
    assert_eq!(v, vec!["a-scanner".to_string(), "b-scanner".to_string()]);
}
