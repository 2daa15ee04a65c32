pub mod holding;
pub mod market_data;
pub mod snapshot;
