// src/core/mod.rs

pub mod config_loader;
pub mod paths;
pub mod phpunit;
pub mod pipeline;
pub mod probe;
pub mod setting;
pub mod tasks;
pub mod version;
