pub mod apply;
pub mod artifact;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod gate;
pub mod git;
pub mod hooks;
pub mod outputs;
pub mod telemetry;
pub mod ui;

pub use error::{Result, VersionGateError};
