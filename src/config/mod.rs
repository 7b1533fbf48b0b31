pub mod args;
mod structs;

pub use args::{Cli, CliCommand};
pub use structs::*;
