mod app_config;
pub mod chain_config;
pub mod contract;
pub mod rpc;

pub use app_config::*;
pub use chain_config::*;
pub use contract::*;
pub use rpc::*;
