//! HTTP communication with the workspace service

pub mod client;
pub mod workspace;
