pub mod accounts_api;
pub mod explorer;
pub mod hashrate;
pub mod stats_api;
pub mod xuni_api;
