pub mod activation;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluate;
pub mod loss;
pub mod model;
pub mod plot;

pub use error::{Error, Result};
