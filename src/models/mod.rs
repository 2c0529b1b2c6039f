pub mod night;
pub mod quality;
