//! Data models for document records and configuration.

pub mod config;
pub mod document;
