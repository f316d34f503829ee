pub mod aggregator;
pub mod dto;
pub mod rate;
pub mod session;
pub mod target;
