//! Deployment module

pub mod batch;
pub mod executor;
pub mod fsm;
