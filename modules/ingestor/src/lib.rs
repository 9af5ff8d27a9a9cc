//! Conversion of OVAL definitions documents into flat, resolved definition records.

pub mod model;
pub mod service;
