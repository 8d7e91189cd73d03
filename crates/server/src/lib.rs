//! HTTP surface of the HOS scheduler

pub mod api;
pub mod config;
