pub mod cli;
pub mod clipboard;
pub mod config;
pub mod errors;
pub mod form;
pub mod history;
pub mod log;
pub mod prompt;
pub mod provider;
pub mod session;
pub mod storage;
pub mod ux;
pub mod wire;

pub use errors::{ListingError, Result};
