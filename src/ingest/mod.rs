pub mod csv;

pub use csv::{load_trades, parse_trades};
