use lazy_static::lazy_static;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

use venuelink_core::{Result, VenueLinkError};

/// Decimal places kept when a venue float is converted to a `Decimal`.
pub const WIRE_DECIMAL_SCALE: u32 = 8;

lazy_static! {
    static ref DEFAULT_CURRENCY_ALIASES: HashMap<&'static str, &'static str> = {
        let mut aliases = HashMap::new();
        aliases.insert("XBT", "BTC");
        aliases
    };
}

/// Maps venue asset codes to canonical currency codes and back.
///
/// Codes are trimmed and upper-cased; codes without an alias pass through,
/// so a newly listed asset never breaks balance ingestion.
#[derive(Debug, Clone)]
pub struct CurrencyNormalizer {
    to_canonical: HashMap<String, String>,
    to_venue: HashMap<String, String>,
}

impl CurrencyNormalizer {
    pub fn new() -> Self {
        let mut normalizer = Self {
            to_canonical: HashMap::new(),
            to_venue: HashMap::new(),
        };

        for (venue, canonical) in DEFAULT_CURRENCY_ALIASES.iter() {
            normalizer.add_alias(venue, canonical);
        }

        normalizer
    }

    /// Built-in aliases overlaid with `aliases` (venue code → canonical code).
    pub fn with_aliases<I, K, V>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut normalizer = Self::new();
        for (venue, canonical) in aliases {
            normalizer.add_alias(venue.as_ref(), canonical.as_ref());
        }
        normalizer
    }

    pub fn add_alias(&mut self, venue_code: &str, canonical_code: &str) {
        let venue_code = trim_upper(venue_code);
        let canonical_code = trim_upper(canonical_code);

        self.to_venue.insert(canonical_code.clone(), venue_code.clone());
        self.to_canonical.insert(venue_code, canonical_code);
    }

    pub fn to_canonical(&self, venue_code: &str) -> String {
        let code = trim_upper(venue_code);
        self.to_canonical.get(&code).cloned().unwrap_or(code)
    }

    pub fn to_venue(&self, canonical_code: &str) -> String {
        let code = trim_upper(canonical_code);
        self.to_venue.get(&code).cloned().unwrap_or(code)
    }
}

impl Default for CurrencyNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn trim_upper(s: &str) -> String {
    s.trim().to_uppercase()
}

pub fn trim_lower(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Convert a venue float into a `Decimal`, rounded half-to-even at
/// [`WIRE_DECIMAL_SCALE`]. This is the only place floats enter the domain.
pub fn decimal_from_wire(value: f64, field: &str) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(VenueLinkError::ResponseParse(format!(
            "non-finite value for field {}: {}",
            field, value
        )));
    }

    Decimal::from_f64(value)
        .map(|d| {
            d.round_dp_with_strategy(WIRE_DECIMAL_SCALE, RoundingStrategy::MidpointNearestEven)
                .normalize()
        })
        .ok_or_else(|| {
            VenueLinkError::ResponseParse(format!("value out of range for field {}: {}", field, value))
        })
}
