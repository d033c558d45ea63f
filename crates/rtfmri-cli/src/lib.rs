//! Library side of the `rtfmri` command: settings, logging and the explore session.

pub mod config;
pub mod logging;
pub mod session;
