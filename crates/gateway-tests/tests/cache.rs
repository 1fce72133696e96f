//! Response cache tests.

use gateway_client::{MarketMakersQuery, Range};
use gateway_tests::{DEFAULT_BASKET_SIZE, LedgerScript, default_usd_pair, spawn_stack, trade};

#[tokio::test]
async fn test_repeat_request_served_from_cache() {
    let script = LedgerScript::new().with_rows(&default_usd_pair(), vec![trade(4.0, "rA", "rB")]);
    let (gateway, ledger) = spawn_stack(script, true).await;
    let query = MarketMakersQuery::default().start_time("2014-01-01");

    let first = gateway.client.market_makers(&query).await.expect("first");
    let second = gateway.client.market_makers(&query).await.expect("second");

    assert_eq!(first, second);
    assert_eq!(ledger.call_count(), DEFAULT_BASKET_SIZE);
}

#[tokio::test]
async fn test_different_parameters_miss() {
    let (gateway, ledger) = spawn_stack(LedgerScript::new(), true).await;

    gateway
        .client
        .market_makers(&MarketMakersQuery::default().start_time("2014-01-01"))
        .await
        .expect("first");
    gateway
        .client
        .market_makers(
            &MarketMakersQuery::default()
                .start_time("2014-01-01")
                .range(Range::SevenDays),
        )
        .await
        .expect("second");

    assert_eq!(ledger.call_count(), 2 * DEFAULT_BASKET_SIZE);
}

#[tokio::test]
async fn test_without_cache_every_request_recomputes() {
    let (gateway, ledger) = spawn_stack(LedgerScript::new(), false).await;
    let query = MarketMakersQuery::default().start_time("2014-01-01");

    gateway.client.market_makers(&query).await.expect("first");
    gateway.client.market_makers(&query).await.expect("second");

    assert_eq!(ledger.call_count(), 2 * DEFAULT_BASKET_SIZE);
}

#[tokio::test]
async fn test_unknown_fields_do_not_split_entries() {
    let (gateway, ledger) = spawn_stack(LedgerScript::new(), true).await;

    for i in 0..3 {
        gateway
            .client
            .post_raw(
                "marketMakers",
                &serde_json::json!({"startTime": "2014-01-01", "nonce": i}),
            )
            .await
            .expect("request");
    }

    assert_eq!(ledger.call_count(), DEFAULT_BASKET_SIZE);
}
