//! Health check endpoint tests.

use gateway_tests::{LedgerScript, spawn_stack};

#[tokio::test]
async fn test_health_check() {
    let (gateway, _) = spawn_stack(LedgerScript::new(), false).await;

    let health = gateway.client.health_check().await.expect("Health check failed");

    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
    assert!(!health.cache_enabled);
}

#[tokio::test]
async fn test_health_reports_cache() {
    let (gateway, _) = spawn_stack(LedgerScript::new(), true).await;

    let health = gateway.client.health_check().await.expect("Health check failed");

    assert!(health.cache_enabled);
}
