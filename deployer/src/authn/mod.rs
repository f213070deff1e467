//! Request authentication

pub mod csrf;
