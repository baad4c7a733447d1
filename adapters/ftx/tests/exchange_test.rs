use async_trait::async_trait;
use mockall::{mock, Sequence};
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

use venuelink_core::prelude::*;
use venuelink_exchange::{CurrencyNormalizer, Exchange};
use venuelink_ftx::{BalanceRow, Envelope, FtxExchange, OrderRow, PlaceOrderPayload, RequestGateway};
use venuelink_monitoring::StructuredLogger;

mock! {
    pub Gateway {}

    #[async_trait]
    impl RequestGateway for Gateway {
        async fn balances(&self) -> Result<Envelope<Vec<BalanceRow>>>;
        async fn place_order(&self, payload: &PlaceOrderPayload) -> Result<Envelope<OrderRow>>;
        async fn open_orders(&self, market: &str) -> Result<Envelope<Vec<OrderRow>>>;
    }
}

fn exchange(gateway: MockGateway) -> FtxExchange {
    FtxExchange::new(Arc::new(gateway), CurrencyNormalizer::new(), StructuredLogger::new("ftx-test"))
}

fn order_row(id: u64, market: &str) -> OrderRow {
    OrderRow {
        id: Some(id),
        client_id: None,
        market: Some(market.to_string()),
        order_type: Some("limit".to_string()),
        side: Some("buy".to_string()),
        price: Some(100.0),
        size: Some(1.0),
        filled_size: Some(0.0),
        status: Some("new".to_string()),
        created_at: Some("2021-01-01T00:00:00+00:00".to_string()),
        ..Default::default()
    }
}

fn limit(symbol: &str) -> SubmitOrder {
    SubmitOrder::new_limit(symbol, OrderSide::Buy, dec!(1), dec!(100))
}

#[tokio::test]
async fn test_balances_split_free_and_total() {
    let mut gateway = MockGateway::new();
    gateway.expect_balances().times(1).returning(|| {
        Ok(Envelope::ok(vec![BalanceRow {
            coin: "USD".to_string(),
            free: 10.0,
            total: 15.0,
        }]))
    });

    let balances = exchange(gateway)
        .query_account_balances(&Context::background())
        .await
        .unwrap();

    let usd = &balances["USD"];
    assert_eq!(usd.currency, "USD");
    assert_eq!(usd.available, dec!(10));
    assert_eq!(usd.locked, dec!(5));
}

#[tokio::test]
async fn test_balances_venue_failure_is_rejection() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_balances()
        .times(1)
        .returning(|| Ok(Envelope::failed("Not logged in")));

    let err = exchange(gateway)
        .query_account_balances(&Context::background())
        .await
        .unwrap_err();

    assert!(err.is_venue_rejection());
    assert_eq!(err.to_string(), "ftx returns querying balances failure");
}

#[tokio::test]
async fn test_balances_transport_failure_is_propagated() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_balances()
        .times(1)
        .returning(|| Err(VenueLinkError::Transport("connection reset".to_string())));

    let err = exchange(gateway)
        .query_account_balances(&Context::background())
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert!(!err.is_venue_rejection());
}

#[tokio::test]
async fn test_balances_success_without_result_is_parse_error() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_balances()
        .times(1)
        .returning(|| Ok(serde_json::from_str(r#"{"success":true}"#).unwrap()));

    let err = exchange(gateway)
        .query_account_balances(&Context::background())
        .await
        .unwrap_err();

    assert!(err.is_parse());
}

#[tokio::test]
async fn test_open_orders_null_result_is_parse_error() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_open_orders()
        .times(1)
        .returning(|_| Ok(serde_json::from_str(r#"{"success":true,"result":null}"#).unwrap()));

    let err = exchange(gateway)
        .query_open_orders(&Context::background(), "BTC-USD")
        .await
        .unwrap_err();

    assert!(err.is_parse());
}

#[tokio::test]
async fn test_unsupported_time_in_force_makes_no_request() {
    let mut gateway = MockGateway::new();
    gateway.expect_place_order().never();

    let order = limit("BTC-USD").with_time_in_force(TimeInForce::ImmediateOrCancel);
    let err = exchange(gateway)
        .submit_orders(&Context::background(), &[order])
        .await
        .unwrap_err();

    assert!(err.created.is_empty());
    assert!(err.source.is_unsupported());
}

#[tokio::test]
async fn test_batch_stops_at_first_rejection() {
    let mut gateway = MockGateway::new();
    let mut seq = Sequence::new();

    gateway
        .expect_place_order()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|payload| Ok(Envelope::ok(order_row(1, &payload.market))));
    gateway
        .expect_place_order()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(Envelope::failed("Not enough balances")));

    let orders = vec![limit("BTC-USD"), limit("ETH-USD"), limit("SOL-USD")];
    let (created, err) = exchange(gateway)
        .submit_orders(&Context::background(), &orders)
        .await
        .unwrap_err()
        .into_parts();

    assert_eq!(created.len(), 1);
    assert_eq!(created[0].order_id, 1);
    assert_eq!(created[0].symbol, "BTC-USD");
    assert!(err.is_venue_rejection());
    assert_eq!(err.to_string(), "ftx returns placing order failure");
}

#[tokio::test]
async fn test_payload_is_normalised() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_place_order()
        .withf(|payload| {
            payload.market == "BTC-USD"
                && payload.side == "buy"
                && payload.order_type == "limit"
                && payload.price == Some(dec!(100))
                && payload.size == dec!(1)
                && !payload.reduce_only
                && !payload.ioc
                && !payload.post_only
        })
        .times(1)
        .returning(|payload| Ok(Envelope::ok(order_row(7, &payload.market))));

    let created = exchange(gateway)
        .submit_orders(&Context::background(), &[limit("btc-usd")])
        .await
        .unwrap();

    assert_eq!(created.len(), 1);
    assert_eq!(created[0].status, OrderStatus::New);
}

#[tokio::test]
async fn test_malformed_open_order_fails_whole_listing() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_open_orders()
        .withf(|market| market.to_string() == "BTC-USD")
        .times(1)
        .returning(|market| {
            let mut malformed = order_row(2, market);
            malformed.side = None;
            Ok(Envelope::ok(vec![order_row(1, market), malformed]))
        });

    let err = exchange(gateway)
        .query_open_orders(&Context::background(), "BTC-USD")
        .await
        .unwrap_err();

    assert!(err.is_parse());
}

#[tokio::test]
async fn test_open_orders_rejection() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_open_orders()
        .times(1)
        .returning(|_| Ok(Envelope::failed("Invalid market")));

    let err = exchange(gateway)
        .query_open_orders(&Context::background(), "BTC-USD")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "ftx returns querying open orders failure");
}

#[tokio::test]
async fn test_cancelled_context_makes_no_request() {
    let mut gateway = MockGateway::new();
    gateway.expect_balances().never();
    gateway.expect_place_order().never();

    let (ctx, cancel) = Context::with_cancel();
    cancel.cancel();

    let exchange = exchange(gateway);
    assert!(matches!(
        exchange.query_account_balances(&ctx).await,
        Err(VenueLinkError::Cancelled)
    ));

    let err = exchange.submit_orders(&ctx, &[limit("BTC-USD")]).await.unwrap_err();
    assert!(err.created.is_empty());
    assert!(matches!(err.source, VenueLinkError::Cancelled));
}

struct StalledGateway;

#[async_trait]
impl RequestGateway for StalledGateway {
    async fn balances(&self) -> Result<Envelope<Vec<BalanceRow>>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Envelope::ok(Vec::new()))
    }

    async fn place_order(&self, _payload: &PlaceOrderPayload) -> Result<Envelope<OrderRow>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Envelope::failed("unreachable"))
    }

    async fn open_orders(&self, _market: &str) -> Result<Envelope<Vec<OrderRow>>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Envelope::ok(Vec::new()))
    }
}

#[tokio::test]
async fn test_cancellation_aborts_in_flight_request() {
    let exchange = FtxExchange::new(
        Arc::new(StalledGateway),
        CurrencyNormalizer::new(),
        StructuredLogger::new("ftx-test"),
    );
    let (ctx, cancel) = Context::with_cancel();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();
    });

    let result = tokio::time::timeout(Duration::from_secs(5), exchange.query_open_orders(&ctx, "BTC-USD"))
        .await
        .expect("cancellation did not interrupt the request");

    assert!(matches!(result, Err(VenueLinkError::Cancelled)));
}

#[tokio::test]
async fn test_unimplemented_capabilities_are_typed() {
    let exchange = exchange(MockGateway::new());
    let ctx = Context::background();

    assert_eq!(exchange.name(), VenueId::Ftx);
    assert!(exchange.supports(Capability::SubmitOrders));
    assert!(!exchange.supports(Capability::CancelOrders));

    assert!(exchange.query_ticker(&ctx, "BTC-USD").await.unwrap_err().is_not_implemented());
    assert!(exchange.cancel_orders(&ctx, &[]).await.unwrap_err().is_not_implemented());
    assert!(exchange.query_markets(&ctx).await.unwrap_err().is_not_implemented());
    assert!(exchange
        .query_trades(&ctx, "BTC-USD", &TradeQueryOptions::default())
        .await
        .unwrap_err()
        .is_not_implemented());

    let err = exchange.platform_fee_currency().await.unwrap_err();
    assert_eq!(err.to_string(), "platform fee currency is not implemented for ftx");
}
