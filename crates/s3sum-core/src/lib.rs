pub mod config;
pub mod logging;

// Engine modules
pub mod engine;
pub mod error;
pub mod hasher;
pub mod manifest;
pub mod part;
pub mod planner;
pub mod pool;
pub mod render;
pub mod retry;
pub mod s3url;
