//! Emitting resolved documents to the file system.

pub mod config;
pub mod service;
