//! Infrastructure layer: catalog adapters, forecast runner, job tracking, config.

pub mod catalog;
pub mod config;
pub mod jobs;
pub mod read_model;
pub mod replenishment;
