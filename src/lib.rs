pub mod catalog;
pub mod config;
pub mod decoder;
pub mod error;
pub mod frame;
pub mod headless;
pub mod host;
pub mod input;
pub mod navigator;
pub mod pixel;
pub mod session;

pub use error::{Error, Result};
pub use session::Session;
