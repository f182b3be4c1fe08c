pub mod exchangerate_api;
pub mod fallback;

pub use exchangerate_api::ExchangeRateApiProvider;
pub use fallback::FallbackRateResolver;
