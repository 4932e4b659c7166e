//! Command-line front end for the Bayesian search game: configuration,
//! logging, the interactive menu and a batch simulation harness.

pub mod config;
pub mod logging;
pub mod menu;
pub mod play;
pub mod simulate;
