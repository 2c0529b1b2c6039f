pub mod backup;
pub mod detail;
pub mod export;
pub mod factory;
pub mod live_data;
pub mod log;
pub mod quality;
pub mod scope;
pub mod tracker;
