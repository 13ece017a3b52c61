//! Block-indexed log retrieval.

pub mod rpc;
pub mod source;
pub mod window;

pub use rpc::JsonRpcLogSource;
pub use source::{LogFilter, LogRecord, LogSource, LogSourceError, TopicFilter};
pub use window::{fetch_recent_logs, WindowOptions, WindowedLogReader};
