pub mod coinmarketcap;
pub mod traits;

pub use coinmarketcap::CoinMarketCapSource;
pub use traits::MarketDataSource;
