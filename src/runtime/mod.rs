//! Application lifecycle and execution modes

pub mod args;
pub mod lifetime;
pub mod modes;

pub use args::{Args, Command};
