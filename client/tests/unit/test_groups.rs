//! Group entity and bulk operation tests

mod common;

use http::Method;

use common::{app, FakeMarathon};
use marathon_client::errors::ClientError;
use marathon_client::models::Group;
use marathon_client::resources::{BulkOp, Groups};

/// `/infra` owning `[a, b]` and a child `/infra/cache` owning `[c, d]`
fn infra_tree() -> Group {
    Group::new("/infra")
        .with_app(app("/infra/a", 1))
        .with_app(app("/infra/b", 1))
        .with_group(
            Group::new("/infra/cache")
                .with_app(app("/infra/cache/c", 1))
                .with_app(app("/infra/cache/d", 1)),
        )
}

fn seeded() -> std::sync::Arc<FakeMarathon> {
    let tree = infra_tree();
    let fake = FakeMarathon::with_apps(marathon_client::traverse::walk(&tree).cloned());
    fake.state().groups.insert("/infra".to_string(), tree);
    fake
}

fn put_paths(fake: &FakeMarathon) -> Vec<String> {
    fake.writes()
        .into_iter()
        .filter(|r| r.method == Method::PUT)
        .map(|r| r.path)
        .collect()
}

#[tokio::test]
async fn test_scale_visits_in_pre_order() {
    let fake = seeded();
    let mut infra = Groups::new(fake.transport());
    infra.get("/infra").await.unwrap();

    infra.scale(3, true).await.unwrap();

    assert_eq!(
        put_paths(&fake),
        vec![
            "/v2/apps/infra/a",
            "/v2/apps/infra/b",
            "/v2/apps/infra/cache/c",
            "/v2/apps/infra/cache/d",
        ]
    );
    for id in ["/infra/a", "/infra/b", "/infra/cache/c", "/infra/cache/d"] {
        assert_eq!(fake.app(id).unwrap().instances, 3);
    }
}

#[tokio::test]
async fn test_bulk_continues_and_returns_last_error() {
    let fake = seeded();
    {
        let mut state = fake.state();
        state.failing.insert("/infra/b".to_string());
        state.failing.insert("/infra/cache/d".to_string());
    }
    let mut infra = Groups::new(fake.transport());
    infra.get("/infra").await.unwrap();

    let report = infra.stop_report(true).await.unwrap();
    assert_eq!(report.visited.len(), 4);
    assert_eq!(report.succeeded(), 2);
    let failed: Vec<_> = report.failures.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(failed, vec!["/infra/b", "/infra/cache/d"]);

    // partial failure leaves the others changed
    assert_eq!(fake.app("/infra/a").unwrap().instances, 0);
    assert_eq!(fake.app("/infra/b").unwrap().instances, 1);
    assert_eq!(fake.app("/infra/cache/c").unwrap().instances, 0);

    let err = infra.stop(true).await.unwrap_err();
    assert!(matches!(err, ClientError::Remote { status: 500, .. }));
}

#[tokio::test]
async fn test_last_error_is_the_latest_one() {
    let fake = seeded();
    let mut infra = Groups::new(fake.transport());
    infra.get("/infra").await.unwrap();
    fake.state().apps.remove("/infra/cache/d");
    fake.state().failing.insert("/infra/b".to_string());

    // b fails with a 500 then d with a 404: the 404 wins
    let err = infra.restart(false).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}

#[tokio::test]
async fn test_restart_and_start() {
    let fake = seeded();
    let mut infra = Groups::new(fake.transport());
    infra.get("/infra").await.unwrap();

    infra.restart(true).await.unwrap();
    let restarts = fake
        .writes()
        .into_iter()
        .filter(|r| r.method == Method::POST && r.path.ends_with("/restart"))
        .count();
    assert_eq!(restarts, 4);

    infra.start(2, false).await.unwrap();
    infra.suspend(false).await.unwrap();
    assert_eq!(fake.app("/infra/cache/d").unwrap().instances, 0);
}

#[tokio::test]
async fn test_apply_writes_held_definitions() {
    let fake = FakeMarathon::new();
    let mut infra = Groups::new(fake.transport());
    infra.set(infra_tree());

    let report = infra.apply_report(true).await.unwrap();
    assert!(report.is_ok());
    assert_eq!(put_paths(&fake).len(), 4);
    assert!(fake.writes().iter().all(|r| r.is_forced()));
    assert_eq!(fake.app("/infra/cache/c").unwrap(), app("/infra/cache/c", 1));
    // apply never fetches
    assert!(fake.requests().iter().all(|r| r.method != Method::GET));
}

#[tokio::test]
async fn test_bulk_op_dispatch() {
    let fake = seeded();
    let mut infra = Groups::new(fake.transport());
    infra.get("/infra").await.unwrap();

    let report = infra.bulk_report(BulkOp::Scale(5), true).await.unwrap();
    assert!(report.is_ok());
    assert_eq!(fake.app("/infra/b").unwrap().instances, 5);
}

#[tokio::test]
async fn test_unset_group_is_rejected() {
    let fake = seeded();
    let mut infra = Groups::new(fake.transport());

    assert!(matches!(infra.scale(1, true).await, Err(ClientError::EmptyEntity(_))));
    assert!(matches!(infra.apply(true).await, Err(ClientError::EmptyEntity(_))));
    assert!(matches!(infra.destroy().await, Err(ClientError::EmptyEntity(_))));

    // an empty id drops a previously held tree
    infra.get("/infra").await.unwrap();
    assert!(infra.is_set());
    assert!(matches!(infra.get("").await.err(), Some(ClientError::EmptyEntity(_))));
    assert!(!infra.is_set());
    assert_eq!(infra.id(), "");
    assert_eq!(infra.as_raw(), Group::default());
    assert!(matches!(infra.scale(1, true).await, Err(ClientError::EmptyEntity(_))));

    infra.get("/infra").await.unwrap();
    assert!(infra.get("/absent").await.is_err());
    assert!(!infra.is_set());
    assert!(fake.writes().is_empty());
}

#[tokio::test]
async fn test_create_update_destroy() {
    let fake = FakeMarathon::new();
    let mut infra = Groups::new(fake.transport());

    infra.create(infra_tree()).await.unwrap();
    infra.update(infra_tree().with_app(app("/infra/e", 1))).await.unwrap();
    assert_eq!(infra.as_raw().apps.len(), 3);
    assert!(infra.deployment().is_some());

    let methods: Vec<_> = fake.writes().into_iter().map(|r| r.method).collect();
    assert_eq!(methods, vec![Method::POST, Method::PUT]);
    assert_eq!(fake.state().groups["/infra"].apps.len(), 3);

    infra.destroy().await.unwrap();
    assert!(!infra.is_set());
    assert!(fake.state().groups.is_empty());

    assert!(matches!(
        infra.create(Group::default()).await,
        Err(ClientError::EmptyEntity(_))
    ));
}

#[tokio::test]
async fn test_load_and_dump() {
    let dir = tempfile::tempdir().unwrap();
    let fake = FakeMarathon::new();
    let mut infra = Groups::new(fake.transport());
    infra.set(infra_tree());

    let path = dir.path().join("infra.yml");
    infra.dump(&path).await.unwrap();

    let mut loaded = Groups::new(fake.transport());
    loaded.load(&path).await.unwrap();
    assert_eq!(loaded.as_raw(), infra_tree());

    let unset = Groups::new(fake.transport());
    assert!(matches!(
        unset.dump(dir.path().join("x.json")).await,
        Err(ClientError::EmptyEntity(_))
    ));
}
