//! Filtered application set tests

mod common;

use std::sync::Arc;

use common::{app, FakeMarathon};
use marathon_client::errors::ClientError;
use marathon_client::resources::{BulkOp, FilteredApps};

fn seeded() -> Arc<FakeMarathon> {
    FakeMarathon::with_apps([
        app("/infra/redis-1", 1),
        app("/infra/redis-2", 1),
        app("/infra/kafka", 3),
        app("/web/front", 2),
    ])
}

#[tokio::test]
async fn test_get_by_prefix() {
    let fake = seeded();
    let mut apps = FilteredApps::new(fake.transport());

    apps.get("/infra").await.unwrap();
    assert_eq!(apps.len(), 3);

    // a new get replaces the snapshot
    apps.get("/web").await.unwrap();
    let ids: Vec<_> = apps.as_raw().iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["/web/front"]);
}

#[tokio::test]
async fn test_filter_by_predicate() {
    let fake = seeded();
    let mut apps = FilteredApps::new(fake.transport());
    apps.get("/infra").await.unwrap();

    apps.filter_by(|app| app.id.contains("redis"));
    assert_eq!(apps.len(), 2);

    apps.filter_by(|app| app.instances > 10);
    assert!(apps.is_empty());
}

#[tokio::test]
async fn test_scale_updates_snapshot_optimistically() {
    let fake = seeded();
    let mut apps = FilteredApps::new(fake.transport());
    apps.get("/infra/redis").await.unwrap();

    apps.scale(4, true).await.unwrap();

    assert!(apps.as_raw().iter().all(|a| a.instances == 4));
    assert_eq!(fake.app("/infra/redis-2").unwrap().instances, 4);
    assert_eq!(fake.app("/infra/kafka").unwrap().instances, 3);
}

#[tokio::test]
async fn test_failure_keeps_cached_count_and_continues() {
    let fake = seeded();
    fake.state().failing.insert("/infra/kafka".to_string());
    let mut apps = FilteredApps::new(fake.transport());
    apps.get("/infra").await.unwrap();

    let report = apps.bulk_report(BulkOp::Stop, true).await.unwrap();
    assert_eq!(report.visited.len(), 3);
    assert_eq!(report.failures.len(), 1);

    let cached = apps.as_map();
    assert_eq!(cached.len(), 3);
    for summary in cached.values() {
        assert_eq!(summary.image, "docker.io/redis-ha:5.0.5");
    }
    let kafka = apps.as_raw().iter().find(|a| a.id == "/infra/kafka").unwrap();
    assert_eq!(kafka.instances, 3);
    assert_eq!(fake.app("/infra/redis-1").unwrap().instances, 0);

    assert!(apps.suspend(true).await.is_err());
}

#[tokio::test]
async fn test_bulk_returns_the_latest_failure() {
    let fake = seeded();
    let mut apps = FilteredApps::new(fake.transport());
    apps.get("/infra").await.unwrap();
    fake.state().failing.insert("/infra/kafka".to_string());
    fake.state().apps.remove("/infra/redis-2");

    // kafka fails with a 500, redis-2 later with a 404
    let report = apps.bulk_report(BulkOp::Stop, true).await.unwrap();
    let failed: Vec<_> = report.failures.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(failed, vec!["/infra/kafka", "/infra/redis-2"]);
    assert_eq!(report.succeeded(), 1);

    let err = apps.stop(true).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
    assert_eq!(fake.app("/infra/redis-1").unwrap().instances, 0);
}

#[tokio::test]
async fn test_empty_prefix_keeps_snapshot() {
    let fake = seeded();
    let mut apps = FilteredApps::new(fake.transport());
    apps.get("/web").await.unwrap();
    let before = fake.requests().len();

    apps.get("").await.unwrap();
    let ids: Vec<_> = apps.as_raw().iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["/web/front"]);
    assert_eq!(fake.requests().len(), before);

    let mut fresh = FilteredApps::new(fake.transport());
    fresh.get("").await.unwrap();
    assert!(fresh.is_empty());
}

#[tokio::test]
async fn test_restart_leaves_counts() {
    let fake = seeded();
    let mut apps = FilteredApps::new(fake.transport());
    apps.get("/web").await.unwrap();

    apps.restart(false).await.unwrap();
    apps.start(5, false).await.unwrap();
    assert_eq!(apps.as_raw()[0].instances, 5);
}

#[tokio::test]
async fn test_empty_set_is_rejected() {
    let fake = seeded();
    let mut apps = FilteredApps::new(fake.transport());
    apps.get("/nothing").await.unwrap();

    assert!(matches!(apps.stop(true).await, Err(ClientError::EmptySet(_))));
    assert!(matches!(
        apps.dump("apps.json").await,
        Err(ClientError::EmptySet(_))
    ));
    assert!(fake.writes().is_empty());
}

#[tokio::test]
async fn test_dump_load_and_dump_singly() {
    let dir = tempfile::tempdir().unwrap();
    let fake = seeded();
    let mut apps = FilteredApps::new(fake.transport());
    apps.get("/infra").await.unwrap();

    let all = dir.path().join("all.json");
    apps.dump(&all).await.unwrap();

    let mut loaded = FilteredApps::new(fake.transport());
    loaded.load(&all, "/infra/redis").await.unwrap();
    assert_eq!(loaded.len(), 2);

    apps.dump_singly(dir.path().join("single-.yaml")).await.unwrap();
    for name in ["redis-1", "redis-2", "kafka"] {
        assert!(dir.path().join(format!("single-{}.yaml", name)).exists());
    }

    assert!(loaded.load(dir.path().join("missing.json"), "/").await.is_err());
    assert!(loaded.is_empty());
}
