use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tokio::signal;
use tracing::{info, warn};

use venuelink_account::Account;
use venuelink_core::config::VenueLinkConfig;
use venuelink_core::prelude::*;
use venuelink_exchange::Exchange;
use venuelink_ftx::FtxExchange;
use venuelink_monitoring::{setup_logging, StructuredLogger};

#[derive(Parser)]
#[command(name = "venuelink")]
#[command(about = "Query balances and manage orders on a trading venue")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: String,

    /// Log level, overrides the configuration file
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the account and print non-zero balances
    Balances,
    /// List open orders for a market
    OpenOrders {
        #[arg(short, long)]
        symbol: String,
    },
    /// Place a single order
    Submit {
        #[arg(short, long)]
        symbol: String,

        #[arg(long)]
        side: OrderSide,

        #[arg(long = "type", default_value = "limit")]
        order_type: OrderType,

        #[arg(short, long)]
        quantity: Decimal,

        /// Required for limit orders
        #[arg(short, long)]
        price: Option<Decimal>,

        #[arg(long, default_value = "GTC")]
        time_in_force: TimeInForce,

        /// Defaults to a random UUID
        #[arg(long)]
        client_id: Option<String>,
    },
    /// Show version information
    Version,
}

fn print_orders(orders: &[Order]) {
    for order in orders {
        println!(
            "{:>12} {:<12} {:<4} {:<6} {:>14} @ {:<14} filled {:<14} {}",
            order.order_id,
            order.symbol,
            order.side,
            order.order_type,
            order.quantity,
            order.price,
            order.executed_quantity,
            order.status
        );
    }
}

/// Cancel `ctx` on the first Ctrl+C.
fn cancel_on_ctrl_c(cancel: CancelHandle) {
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C signal, cancelling");
                cancel.cancel();
            }
            Err(e) => warn!("Failed to install Ctrl+C handler: {}", e),
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("VenueLink v{}", env!("CARGO_PKG_VERSION"));
        println!("Exchange integration adapter with a reconciled account balance view");
        return Ok(());
    }

    let mut config = VenueLinkConfig::from_file(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config))?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    let _logging_guard = setup_logging(&config.logging)?;

    let exchange = FtxExchange::from_config(&config, StructuredLogger::new("ftx"))?;
    let (ctx, cancel) = Context::with_cancel();
    cancel_on_ctrl_c(cancel);

    match cli.command {
        Commands::Balances => {
            let account = Account::load(
                &exchange,
                &ctx,
                config.account.reconcile_policy,
                StructuredLogger::new("account"),
            )
            .await?;

            account.print();
            let mut balances: Vec<Balance> = account.snapshot().into_values().collect();
            balances.sort_by(|a, b| a.currency.cmp(&b.currency));
            for balance in balances.iter().filter(|b| !b.is_zero()) {
                println!(
                    "{:<8} available {:>20} locked {:>20}",
                    balance.currency, balance.available, balance.locked
                );
            }
        }
        Commands::OpenOrders { symbol } => {
            let orders = exchange.query_open_orders(&ctx, &symbol).await?;
            println!("{} open order(s) on {}", orders.len(), exchange.name());
            print_orders(&orders);
        }
        Commands::Submit {
            symbol,
            side,
            order_type,
            quantity,
            price,
            time_in_force,
            client_id,
        } => {
            let order = SubmitOrder {
                client_order_id: Some(client_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string())),
                symbol,
                side,
                order_type,
                quantity,
                price,
                time_in_force,
            };

            let created = exchange.submit_orders(&ctx, &[order]).await?;
            print_orders(&created);
        }
        // printed before the configuration is loaded
        Commands::Version => {}
    }

    Ok(())
}
