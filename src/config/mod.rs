//! Configuration loading and validation
//!
//! Configuration is a flat TOML file. Unrecognized keys are ignored so a
//! config shared with other tooling keeps working.

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::Config;
pub use validation::validate;
