//! End-to-end account synchronisation test
//!
//! Wires the FTX adapter (over an in-memory gateway) into an Account, binds
//! the account to a StandardStream fed from another task, and checks the
//! resulting balance view.

use async_trait::async_trait;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tokio::sync::mpsc;

use venuelink::config::ReconcilePolicy;
use venuelink::{
    balance_map, Account, Balance, BalanceEvent, BalanceRow, Context, CurrencyNormalizer, Envelope,
    FtxExchange, OrderRow, PlaceOrderPayload, RequestGateway, Result, StandardStream, StructuredLogger,
};

struct InMemoryGateway {
    balances: Vec<BalanceRow>,
}

#[async_trait]
impl RequestGateway for InMemoryGateway {
    async fn balances(&self) -> Result<Envelope<Vec<BalanceRow>>> {
        Ok(Envelope::ok(self.balances.clone()))
    }

    async fn place_order(&self, _payload: &PlaceOrderPayload) -> Result<Envelope<OrderRow>> {
        Ok(Envelope::failed("read-only gateway"))
    }

    async fn open_orders(&self, _market: &str) -> Result<Envelope<Vec<OrderRow>>> {
        Ok(Envelope::ok(Vec::new()))
    }
}

fn ftx() -> FtxExchange {
    let gateway = InMemoryGateway {
        balances: vec![
            BalanceRow {
                coin: "USD".to_string(),
                free: 1000.0,
                total: 1250.0,
            },
            BalanceRow {
                coin: "XBT".to_string(),
                free: 0.5,
                total: 0.5,
            },
        ],
    };

    FtxExchange::new(Arc::new(gateway), CurrencyNormalizer::new(), StructuredLogger::new("ftx"))
}

#[tokio::test]
async fn test_load_then_stream_updates() {
    let exchange = ftx();
    let account = Account::load(
        &exchange,
        &Context::background(),
        ReconcilePolicy::LastWriterWins,
        StructuredLogger::new("account"),
    )
    .await
    .unwrap();
    let account = Arc::new(account);

    let seeded = account.snapshot();
    assert_eq!(seeded.len(), 2);
    assert_eq!(seeded["USD"].available, dec!(1000));
    assert_eq!(seeded["USD"].locked, dec!(250));
    assert_eq!(seeded["BTC"].available, dec!(0.5));

    let stream = Arc::new(StandardStream::new());
    account.bind_stream(stream.as_ref());

    let (tx, rx) = mpsc::unbounded_channel();
    let dispatcher = stream.clone().spawn_dispatcher(rx);

    let producer = tokio::spawn(async move {
        tx.send(BalanceEvent::Update(balance_map(vec![Balance::new("ETH", dec!(3), dec!(0))])))
            .unwrap();
        tx.send(BalanceEvent::Update(balance_map(vec![Balance::new("USD", dec!(900), dec!(350))])))
            .unwrap();
        tx.send(BalanceEvent::Snapshot(balance_map(vec![
            Balance::new("BTC", dec!(0.25), dec!(0.25)),
            Balance::new("ETH", dec!(2), dec!(1)),
        ])))
        .unwrap();
    });

    producer.await.unwrap();
    dispatcher.await.unwrap();

    let state = account.snapshot();
    assert_eq!(state.len(), 3);
    assert_eq!(state["USD"].available, dec!(900));
    assert_eq!(state["USD"].locked, dec!(350));
    assert_eq!(state["BTC"].available, dec!(0.25));
    assert_eq!(state["ETH"].available, dec!(2));
    assert_eq!(state["ETH"].locked, dec!(1));

    account.print();
}

#[tokio::test]
async fn test_failed_load_still_accepts_stream() {
    struct DownGateway;

    #[async_trait]
    impl RequestGateway for DownGateway {
        async fn balances(&self) -> Result<Envelope<Vec<BalanceRow>>> {
            Ok(Envelope::failed("Not logged in"))
        }

        async fn place_order(&self, _payload: &PlaceOrderPayload) -> Result<Envelope<OrderRow>> {
            Ok(Envelope::failed("Not logged in"))
        }

        async fn open_orders(&self, _market: &str) -> Result<Envelope<Vec<OrderRow>>> {
            Ok(Envelope::failed("Not logged in"))
        }
    }

    let exchange = FtxExchange::new(Arc::new(DownGateway), CurrencyNormalizer::new(), StructuredLogger::new("ftx"));
    let err = Account::load(
        &exchange,
        &Context::background(),
        ReconcilePolicy::default(),
        StructuredLogger::new("account"),
    )
    .await
    .unwrap_err();
    assert!(err.source.is_venue_rejection());

    let (account, _) = err.into_parts();
    let account = Arc::new(account);
    assert!(account.is_empty());

    let stream = StandardStream::new();
    account.bind_stream(&stream);
    stream.emit_balance_snapshot(&balance_map(vec![Balance::new("USD", dec!(5), dec!(0))]));

    assert_eq!(account.balance("USD").unwrap().available, dec!(5));
}
