//! Command-line interface module.

mod args;
pub mod assemble;
pub mod fixture;
pub mod scripts;

pub use args::{Cli, Commands, PageArgs};
