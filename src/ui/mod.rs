pub mod adapter;
pub mod diff;
pub mod messages;
pub mod rows;
