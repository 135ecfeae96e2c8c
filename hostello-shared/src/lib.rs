#![cfg_attr(not(test), forbid(unsafe_code))]

//! Models and client-side session core shared by the Hostello web client.
//!
//! Nothing in this crate touches the browser: storage and the REST backend
//! are reached through the traits in [`session`], so every state machine
//! here can be exercised natively with fabricated fixtures.

pub mod bootstrap;
pub mod fetch;
pub mod guard;
pub mod models;
pub mod notifications;
pub mod session;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;
