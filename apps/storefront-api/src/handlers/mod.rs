//! # HTTP Handlers
//!
//! One module per resource. Handlers parse the request, call a service and
//! let `ApiError` pick the status code.
//!
//! - [`user`] - sign up, login and user lookup
//! - [`cart`] - cart contents and mutations
//! - [`order`] - order submission and history
//! - [`item`] - catalog lookups

pub mod cart;
pub mod item;
pub mod order;
pub mod user;
