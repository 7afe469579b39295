//! Pricing API access.
//!
//! [`PricingApi`] is the table of operations the grid can trigger. Two
//! implementations ship with the crate:
//!
//! - [`HttpPricingApi`]: blocking `reqwest` client for the real backend
//! - [`MemoryPricingApi`]: in-process catalog for `--demo` and tests
//!
//! The grid never calls the API itself. It queues [`Request`]s; the caller
//! runs them with [`execute`] (on worker threads in the TUI, inline in tests)
//! and feeds the resulting [`Outcome`]s back.

mod client;
mod memory;
mod request;
mod traits;

pub use client::{ApiClientConfig, HttpPricingApi};
pub use memory::MemoryPricingApi;
pub use request::{FieldKey, Mutation, Outcome, Request, Ticket, execute};
pub use traits::PricingApi;
