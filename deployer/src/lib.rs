//! Content package deployer
//!
//! Resolves a content package of an integration workspace, lists its
//! artifacts and deploys a selected subset of them one at a time.

pub mod app;
pub mod authn;
pub mod deploy;
pub mod errors;
pub mod http;
pub mod logs;
pub mod models;
pub mod settings;
pub mod target;
pub mod utils;
