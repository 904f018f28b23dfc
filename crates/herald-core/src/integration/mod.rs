//! Integration layer - the platform client contract.

pub mod client;

pub use client::{BoxedClient, Client, CommandScope};
