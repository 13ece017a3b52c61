pub mod momentum;
pub mod trend;

pub use momentum::{calculate_macd, calculate_macd_default, calculate_rsi, calculate_rsi_default, MacdSignalLine};
pub use trend::calculate_sma;
