pub mod log;

pub use log::LogChannel;
