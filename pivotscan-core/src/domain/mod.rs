//! Domain types — bars, series, profiles, holdings, trades.

pub mod bar;
pub mod holding;
pub mod profile;
pub mod series;
pub mod trade;

pub use bar::Bar;
pub use holding::Holding;
pub use profile::ScanProfile;
pub use series::{BarSeries, SeriesError};
pub use trade::TradeRecord;
