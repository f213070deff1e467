//! Host-facing application layer

pub mod console;
pub mod deployer;
pub mod events;
pub mod session;
