pub mod aggregate;
pub mod calculator;
pub mod export;
pub mod freight;
pub mod logic;
pub mod normalize;

pub use logic::{Core, ReportOptions};
