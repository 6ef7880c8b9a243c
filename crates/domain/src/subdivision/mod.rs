//! Subdivision aggregate with its licenses and usage statistics.

mod aggregate;
mod license;
mod statistic;

pub use aggregate::Subdivision;
pub use license::License;
pub use statistic::StatisticRow;
