//! Exchange-rate repository (Diesel/SQLite).

mod model;
mod repository;

pub use model::ExchangeRateDB;
pub use repository::RateRepository;
