//! Core library: scanning, tag resolution and the batch repair pool.

pub mod batch;
pub mod config;
pub mod exiftool;
pub mod models;
pub mod pipeline;
pub mod resolver;
pub mod scanner;
