pub mod activation;
pub mod completions;
pub mod context;
pub mod error;
pub mod identifiers;
pub mod io;
pub mod paths;
pub mod prompt;
pub mod rules;
pub mod session;
pub mod tasks;
pub mod trigger;
pub mod types;

pub use error::{HookError, Result};
