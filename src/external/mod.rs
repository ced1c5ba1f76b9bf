pub mod iex;
pub mod mock;
pub mod quote_provider;
