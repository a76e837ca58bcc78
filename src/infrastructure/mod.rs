//! # Infrastructure Layer
//!
//! Adapters to external systems. Currently the iiko Cloud API.

pub mod iiko;
