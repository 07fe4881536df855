//! Static fallback rates, USD-denominated.
//!
//! Last-resort source used when neither the cache, the store, nor a
//! USD cross-rate can produce a value. The numbers are approximate and
//! hand-maintained; they exist so a rate lookup can always answer.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::OnceLock;

use super::currency::Currency;

static FALLBACK_RATES: OnceLock<HashMap<Currency, Decimal>> = OnceLock::new();

fn fallback_table() -> &'static HashMap<Currency, Decimal> {
    FALLBACK_RATES.get_or_init(|| {
        let mut map = HashMap::new();

        map.insert(Currency::USD, dec!(1));
        map.insert(Currency::MXN, dec!(17.5));
        map.insert(Currency::EUR, dec!(0.92));
        map.insert(Currency::BRL, dec!(5.1));
        map.insert(Currency::GBP, dec!(0.79));
        map.insert(Currency::CAD, dec!(1.37));
        map.insert(Currency::CNY, dec!(7.25));
        map.insert(Currency::JPY, dec!(149));
        map.insert(Currency::ARS, dec!(365));
        map.insert(Currency::CLP, dec!(920));
        map.insert(Currency::COP, dec!(4100));
        map.insert(Currency::PEN, dec!(3.75));
        map.insert(Currency::CHF, dec!(0.91));
        map.insert(Currency::SEK, dec!(10.9));
        map.insert(Currency::NOK, dec!(11.2));
        map.insert(Currency::DKK, dec!(6.87));
        map.insert(Currency::PLN, dec!(4.35));
        map.insert(Currency::KRW, dec!(1320));
        map.insert(Currency::INR, dec!(83.1));
        map.insert(Currency::SGD, dec!(1.36));
        map.insert(Currency::HKD, dec!(7.81));
        map.insert(Currency::AUD, dec!(1.53));
        map.insert(Currency::NZD, dec!(1.67));
        map.insert(Currency::TWD, dec!(32));
        map.insert(Currency::THB, dec!(36));
        map.insert(Currency::AED, dec!(3.67));
        map.insert(Currency::SAR, dec!(3.75));
        map.insert(Currency::ZAR, dec!(18.5));
        map.insert(Currency::EGP, dec!(30.9));

        map
    })
}

/// Cross-rate between two currencies through the USD-based fallback table.
///
/// Never fails: a currency missing from the table (or a zero entry) degrades
/// to a 1:1 rate. Callers must tolerate the imprecision.
pub fn fallback_rate(from: Currency, to: Currency) -> Decimal {
    if from == to {
        return Decimal::ONE;
    }

    let table = fallback_table();
    match (table.get(&from), table.get(&to)) {
        (Some(from_rate), Some(to_rate)) if !from_rate.is_zero() => to_rate / from_rate,
        _ => {
            log::error!("Missing fallback rate for {} or {}", from, to);
            Decimal::ONE
        }
    }
}
