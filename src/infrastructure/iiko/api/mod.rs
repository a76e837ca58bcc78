//! Endpoint wrappers and wire types, one module per API area.
//!
//! Every wrapper is an `impl IikoClient` method taking the request DTO and
//! [`RequestOptions`](crate::infrastructure::iiko::RequestOptions).

pub mod customers;
pub mod deliveries;
pub mod loyalty;
pub mod menu;
pub mod webhooks;
