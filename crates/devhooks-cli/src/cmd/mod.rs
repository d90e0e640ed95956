pub mod active;
pub mod prompt;
pub mod rules;
pub mod session;
