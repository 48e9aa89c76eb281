//! Roomroute CLI library.
//!
//! Terminal styling and output formatting shared by the `roomroute-cli`
//! subcommands.

pub mod output;
pub mod terminal;
