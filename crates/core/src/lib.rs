#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod scorer;
pub mod time;

pub use error::Error;
pub use time::Clock;
