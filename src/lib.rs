pub mod config;
pub mod error;
pub mod roster;
pub mod service;
pub mod shutdown;
pub mod startup;
pub mod store;
#[cfg(feature = "web-interface")]
pub mod web;
