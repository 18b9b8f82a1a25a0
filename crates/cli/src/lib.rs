//! Public library modules for the CLI crate
pub mod paths;
pub mod report;
