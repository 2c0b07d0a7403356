//! FX (Foreign Exchange) module - rate cache, rate source contract and
//! the converter used to express values in an account's preferred currency.

pub mod currency_converter;
mod fx_errors;
mod fx_model;
mod fx_traits;
mod rate_cache;


pub use currency_converter::CurrencyConverter;
pub use fx_errors::FxError;
pub use fx_model::{CachedRate, RateKey};
pub use fx_traits::{RateCacheTrait, RateSourceTrait};
pub use rate_cache::InMemoryRateCache;
