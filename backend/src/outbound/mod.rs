//! Outbound adapters: concrete implementations of the domain ports.

pub mod github;
pub mod persistence;
pub mod security;
pub mod yelp;
