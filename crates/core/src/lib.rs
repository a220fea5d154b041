#![forbid(unsafe_code)]

pub mod content;
pub mod deck;
pub mod error;
pub mod leg;
pub mod model;
pub mod progression;
pub mod route;
pub mod speed;
pub mod time;

pub use error::Error;
pub use time::Clock;
