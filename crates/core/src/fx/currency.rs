//! Supported currencies and their static display configuration.
//!
//! The set of currencies and their formatting rules are fixed at compile
//! time; there is no dynamic state. Decimal precision drives the rounding
//! applied by the conversion engine (0-decimal currencies such as JPY are
//! always rounded to whole units).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use super::fx_errors::FxError;

/// Currency codes supported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Currency {
    // Americas
    MXN,
    USD,
    CAD,
    BRL,
    ARS,
    CLP,
    COP,
    PEN,
    // Europe
    EUR,
    GBP,
    CHF,
    SEK,
    NOK,
    DKK,
    PLN,
    // Asia Pacific
    CNY,
    JPY,
    KRW,
    INR,
    SGD,
    HKD,
    AUD,
    NZD,
    TWD,
    THB,
    // Middle East & Africa
    AED,
    SAR,
    ZAR,
    EGP,
}

/// Where the symbol sits relative to the formatted amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    Before,
    After,
}

/// Static display configuration for a currency.
#[derive(Debug, Clone)]
pub struct CurrencyConfig {
    pub symbol: &'static str,
    pub position: SymbolPosition,
    pub decimals: u32,
    pub separator: char,
    pub name: &'static str,
}

const ALL_CURRENCIES: &[Currency] = &[
    Currency::MXN,
    Currency::USD,
    Currency::CAD,
    Currency::BRL,
    Currency::ARS,
    Currency::CLP,
    Currency::COP,
    Currency::PEN,
    Currency::EUR,
    Currency::GBP,
    Currency::CHF,
    Currency::SEK,
    Currency::NOK,
    Currency::DKK,
    Currency::PLN,
    Currency::CNY,
    Currency::JPY,
    Currency::KRW,
    Currency::INR,
    Currency::SGD,
    Currency::HKD,
    Currency::AUD,
    Currency::NZD,
    Currency::TWD,
    Currency::THB,
    Currency::AED,
    Currency::SAR,
    Currency::ZAR,
    Currency::EGP,
];

static CURRENCY_CONFIG: OnceLock<HashMap<Currency, CurrencyConfig>> = OnceLock::new();

fn config_table() -> &'static HashMap<Currency, CurrencyConfig> {
    CURRENCY_CONFIG.get_or_init(|| {
        let mut map = HashMap::new();

        let mut insert = |currency: Currency,
                          symbol: &'static str,
                          position: SymbolPosition,
                          decimals: u32,
                          separator: char,
                          name: &'static str| {
            map.insert(
                currency,
                CurrencyConfig {
                    symbol,
                    position,
                    decimals,
                    separator,
                    name,
                },
            );
        };

        insert(Currency::MXN, "$", SymbolPosition::Before, 2, ',', "Mexican Peso");
        insert(Currency::USD, "$", SymbolPosition::Before, 2, ',', "US Dollar");
        insert(Currency::CAD, "C$", SymbolPosition::Before, 2, ',', "Canadian Dollar");
        insert(Currency::BRL, "R$", SymbolPosition::Before, 2, ',', "Brazilian Real");
        insert(Currency::ARS, "$", SymbolPosition::Before, 2, ',', "Argentine Peso");
        insert(Currency::CLP, "$", SymbolPosition::Before, 0, '.', "Chilean Peso");
        insert(Currency::COP, "$", SymbolPosition::Before, 0, ',', "Colombian Peso");
        insert(Currency::PEN, "S/", SymbolPosition::Before, 2, '.', "Peruvian Sol");
        insert(Currency::EUR, "€", SymbolPosition::After, 2, '.', "Euro");
        insert(Currency::GBP, "£", SymbolPosition::Before, 2, ',', "British Pound");
        insert(Currency::CHF, "CHF", SymbolPosition::Before, 2, '.', "Swiss Franc");
        insert(Currency::SEK, "kr", SymbolPosition::After, 2, ',', "Swedish Krona");
        insert(Currency::NOK, "kr", SymbolPosition::After, 2, ',', "Norwegian Krone");
        insert(Currency::DKK, "kr", SymbolPosition::After, 2, ',', "Danish Krone");
        insert(Currency::PLN, "zł", SymbolPosition::After, 2, ',', "Polish Zloty");
        insert(Currency::CNY, "¥", SymbolPosition::Before, 2, ',', "Chinese Yuan");
        insert(Currency::JPY, "¥", SymbolPosition::Before, 0, ',', "Japanese Yen");
        insert(Currency::KRW, "₩", SymbolPosition::Before, 0, ',', "South Korean Won");
        insert(Currency::INR, "₹", SymbolPosition::Before, 2, ',', "Indian Rupee");
        insert(Currency::SGD, "S$", SymbolPosition::Before, 2, ',', "Singapore Dollar");
        insert(Currency::HKD, "HK$", SymbolPosition::Before, 2, ',', "Hong Kong Dollar");
        insert(Currency::AUD, "A$", SymbolPosition::Before, 2, ',', "Australian Dollar");
        insert(Currency::NZD, "NZ$", SymbolPosition::Before, 2, ',', "New Zealand Dollar");
        insert(Currency::TWD, "NT$", SymbolPosition::Before, 0, ',', "Taiwan Dollar");
        insert(Currency::THB, "฿", SymbolPosition::Before, 2, ',', "Thai Baht");
        insert(Currency::AED, "د.إ", SymbolPosition::Before, 2, ',', "UAE Dirham");
        insert(Currency::SAR, "﷼", SymbolPosition::Before, 2, ',', "Saudi Riyal");
        insert(Currency::ZAR, "R", SymbolPosition::Before, 2, ',', "South African Rand");
        insert(Currency::EGP, "£", SymbolPosition::Before, 2, ',', "Egyptian Pound");

        map
    })
}

impl Currency {
    /// All supported currencies, in a stable order.
    pub fn all() -> &'static [Currency] {
        ALL_CURRENCIES
    }

    /// The ISO-4217 code for this currency.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::MXN => "MXN",
            Currency::USD => "USD",
            Currency::CAD => "CAD",
            Currency::BRL => "BRL",
            Currency::ARS => "ARS",
            Currency::CLP => "CLP",
            Currency::COP => "COP",
            Currency::PEN => "PEN",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::CHF => "CHF",
            Currency::SEK => "SEK",
            Currency::NOK => "NOK",
            Currency::DKK => "DKK",
            Currency::PLN => "PLN",
            Currency::CNY => "CNY",
            Currency::JPY => "JPY",
            Currency::KRW => "KRW",
            Currency::INR => "INR",
            Currency::SGD => "SGD",
            Currency::HKD => "HKD",
            Currency::AUD => "AUD",
            Currency::NZD => "NZD",
            Currency::TWD => "TWD",
            Currency::THB => "THB",
            Currency::AED => "AED",
            Currency::SAR => "SAR",
            Currency::ZAR => "ZAR",
            Currency::EGP => "EGP",
        }
    }

    /// Parses a code into a `Currency`, if it is supported.
    pub fn from_code(code: &str) -> Option<Currency> {
        ALL_CURRENCIES.iter().copied().find(|c| c.as_str() == code)
    }

    /// Whether the given code names a supported currency.
    pub fn is_valid_code(code: &str) -> bool {
        Self::from_code(code).is_some()
    }

    /// Static display configuration for this currency.
    pub fn config(&self) -> &'static CurrencyConfig {
        // The table covers every variant.
        &config_table()[self]
    }

    /// Decimal precision used for rounding converted amounts.
    pub fn decimals(&self) -> u32 {
        self.config().decimals
    }

    /// Formats an amount with this currency's symbol, precision, and
    /// thousands separator.
    pub fn format_amount(&self, amount: Decimal) -> String {
        let config = self.config();
        let rounded = amount.round_dp(config.decimals);
        let formatted = group_thousands(&rounded, config.decimals, config.separator);

        match config.position {
            SymbolPosition::Before => format!("{}{}", config.symbol, formatted),
            SymbolPosition::After => format!("{} {}", formatted, config.symbol),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::from_code(s).ok_or_else(|| FxError::InvalidCurrencyCode(s.to_string()))
    }
}

fn group_thousands(amount: &Decimal, decimals: u32, separator: char) -> String {
    let negative = amount.is_sign_negative();
    let abs = amount.abs();

    let whole = abs.trunc().to_i128().unwrap_or(0).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);

    if decimals > 0 {
        let scaled = (abs.fract() * Decimal::from(10u64.pow(decimals))).trunc();
        let fraction = scaled.to_u64().unwrap_or(0);
        // Decimal point stays '.' when the thousands separator is ',' and
        // vice versa, following the per-currency separator convention.
        let point = if separator == ',' { '.' } else { ',' };
        out.push(point);
        out.push_str(&format!("{:0width$}", fraction, width = decimals as usize));
    }

    out
}
