pub mod config;
pub mod manager;

pub use config::RiskConfig;
pub use manager::{
    take_profit_reached, RiskManager, PORTFOLIO_FLOOR, SAVER_RESERVE, TAKE_PROFIT_MULTIPLIER,
};
