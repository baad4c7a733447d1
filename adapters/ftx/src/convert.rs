use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use venuelink_core::{
    Balance, BalanceMap, Order, OrderSide, OrderStatus, OrderType, Result, SubmitOrder, TimeInForce,
    VenueId, VenueLinkError,
};
use venuelink_exchange::{decimal_from_wire, trim_lower, trim_upper, CurrencyNormalizer};

use crate::model::{BalanceRow, OrderRow, PlaceOrderPayload};

/// Wallet rows to canonical balances. `available = free`,
/// `locked = total - free`. Two rows mapping to the same canonical currency
/// fail the whole response.
pub fn to_balance_map(rows: &[BalanceRow], normalizer: &CurrencyNormalizer) -> Result<BalanceMap> {
    let mut balances = BalanceMap::with_capacity(rows.len());

    for row in rows {
        let currency = normalizer.to_canonical(&row.coin);
        let free = decimal_from_wire(row.free, "free")?;
        let total = decimal_from_wire(row.total, "total")?;

        if balances.contains_key(&currency) {
            return Err(VenueLinkError::ResponseParse(format!(
                "wallet rows collide on currency {} (coin {})",
                currency, row.coin
            )));
        }
        balances.insert(currency.clone(), Balance::new(currency, free, total - free));
    }

    Ok(balances)
}

pub fn to_place_order_payload(order: &SubmitOrder) -> PlaceOrderPayload {
    PlaceOrderPayload {
        market: trim_upper(&order.symbol),
        side: trim_lower(&order.side.to_string()),
        price: order.price,
        order_type: trim_lower(&order.order_type.to_string()),
        size: order.quantity,
        reduce_only: false,
        ioc: false,
        post_only: false,
        client_id: order.client_order_id.clone().filter(|id| !id.is_empty()),
    }
}

/// One venue order row to a canonical [`Order`]. Any missing or unreadable
/// field fails the whole row.
pub fn to_global_order(row: &OrderRow) -> Result<Order> {
    let order_id = required(row.id, "id")?;
    let symbol = required(row.market.as_deref(), "market")?;
    let side = required(row.side.as_deref(), "side")?
        .parse::<OrderSide>()
        .map_err(as_parse_error)?;
    let order_type = required(row.order_type.as_deref(), "type")?
        .parse::<OrderType>()
        .map_err(as_parse_error)?;

    // market orders carry a null price
    let price = match row.price {
        Some(price) => decimal_from_wire(price, "price")?,
        None => Decimal::ZERO,
    };
    let quantity = decimal_from_wire(required(row.size, "size")?, "size")?;
    let executed_quantity = decimal_from_wire(row.filled_size.unwrap_or(0.0), "filledSize")?;

    let status = to_order_status(required(row.status.as_deref(), "status")?, quantity, executed_quantity)?;
    let created_at = parse_timestamp(required(row.created_at.as_deref(), "createdAt")?)?;

    Ok(Order {
        exchange: VenueId::Ftx,
        order_id,
        client_order_id: row.client_id.clone().filter(|id| !id.is_empty()),
        symbol: symbol.to_string(),
        side,
        order_type,
        price,
        quantity,
        executed_quantity,
        time_in_force: to_time_in_force(row),
        status,
        created_at,
    })
}

fn to_order_status(status: &str, quantity: Decimal, executed: Decimal) -> Result<OrderStatus> {
    match status {
        "new" => Ok(OrderStatus::New),
        "open" if executed.is_zero() => Ok(OrderStatus::New),
        "open" => Ok(OrderStatus::PartiallyFilled),
        "closed" if executed >= quantity => Ok(OrderStatus::Filled),
        "closed" => Ok(OrderStatus::Canceled),
        other => Err(VenueLinkError::ResponseParse(format!("unknown order status: {}", other))),
    }
}

fn to_time_in_force(row: &OrderRow) -> TimeInForce {
    if row.ioc {
        TimeInForce::ImmediateOrCancel
    } else if row.post_only {
        TimeInForce::PostOnly
    } else {
        TimeInForce::GoodTillCanceled
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| VenueLinkError::ResponseParse(format!("invalid createdAt {}: {}", value, e)))
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| VenueLinkError::ResponseParse(format!("order row is missing {}", field)))
}

fn as_parse_error(err: VenueLinkError) -> VenueLinkError {
    VenueLinkError::ResponseParse(err.to_string())
}
