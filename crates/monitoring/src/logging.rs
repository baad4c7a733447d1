use std::path::Path;

use rust_decimal::Decimal;
use tracing::{error, info, warn};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use venuelink_core::config::LoggingConfig;
use venuelink_core::{Result, VenueLinkError};

/// Keeps the background file writer alive; drop it last.
#[derive(Debug, Default)]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// `RUST_LOG` wins over the configured level; an unparseable level falls back
/// to `info`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn setup_logging(config: &LoggingConfig) -> Result<LoggingGuard> {
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    let mut guard = LoggingGuard::default();

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    if config.json {
        layers.push(console_layer.json().boxed());
    } else {
        layers.push(console_layer.boxed());
    }

    if let Some(log_file) = &config.file {
        let log_path = Path::new(log_file);
        let directory = log_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        std::fs::create_dir_all(directory)?;

        let file_name = log_path
            .file_name()
            .ok_or_else(|| VenueLinkError::InvalidData(format!("Invalid log file path: {}", log_file)))?;

        let (writer, file_guard) = non_blocking(rolling::daily(directory, file_name));
        guard._file_guard = Some(file_guard);

        let file_layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        if config.json {
            layers.push(file_layer.json().boxed());
        } else {
            layers.push(file_layer.boxed());
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter(&config.level))
        .try_init()
        .map_err(|e| VenueLinkError::InvalidData(format!("Failed to initialise logging: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);

    Ok(guard)
}

/// Component-tagged structured events.
///
/// Handed to the account and to venue adapters at construction so every event
/// they emit carries the owning component.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    component: String,
}

impl StructuredLogger {
    pub fn new(component: &str) -> Self {
        Self {
            component: component.to_string(),
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn log_balance(&self, currency: &str, available: Decimal, locked: Decimal) {
        info!(
            component = %self.component,
            event = "balance",
            currency = %currency,
            available = %available,
            locked = %locked,
            "balance {} {}",
            currency,
            available
        );
    }

    pub fn log_balances_loaded(&self, venue: &str, count: usize) {
        info!(
            component = %self.component,
            event = "balances_loaded",
            venue = %venue,
            count = count,
            "Account balances loaded"
        );
    }

    pub fn log_balance_event(&self, kind: &str, count: usize) {
        tracing::debug!(
            component = %self.component,
            event = "balance_event",
            kind = %kind,
            count = count,
            "Balance event applied"
        );
    }

    pub fn log_order(&self, venue: &str, symbol: &str, side: &str, quantity: Decimal, price: Decimal, order_id: u64) {
        info!(
            component = %self.component,
            event = "order_placed",
            venue = %venue,
            symbol = %symbol,
            side = %side,
            quantity = %quantity,
            price = %price,
            order_id = order_id,
            "Order placed"
        );
    }

    pub fn log_venue_rejection(&self, venue: &str, operation: &str) {
        warn!(
            component = %self.component,
            event = "venue_rejected",
            venue = %venue,
            operation = %operation,
            "Venue reported failure"
        );
    }

    pub fn log_exchange_request(&self, venue: &str, endpoint: &str, method: &str, status_code: Option<u16>) {
        tracing::debug!(
            component = %self.component,
            event = "exchange_request",
            venue = %venue,
            endpoint = %endpoint,
            method = %method,
            status_code = ?status_code,
            "Exchange API request"
        );
    }

    pub fn log_error(&self, error: &str, context: Option<&str>) {
        error!(
            component = %self.component,
            event = "error",
            error = %error,
            context = ?context,
            "Error occurred"
        );
    }

    pub fn log_warning(&self, message: &str, context: Option<&str>) {
        warn!(
            component = %self.component,
            event = "warning",
            message = %message,
            context = ?context,
            "Warning"
        );
    }
}

impl Default for StructuredLogger {
    fn default() -> Self {
        Self::new("venuelink")
    }
}
