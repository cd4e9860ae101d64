//! Adapters: inbound drivers of the application.

pub mod inbound;
