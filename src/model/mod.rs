//! Catalog data model.
//!
//! Products are fetched from the pricing API and treated as read-only rows:
//! the only client-side change is replacing a whole row after a mutation
//! succeeds. Wire names follow the API (Spanish keys); Rust names are
//! English.

mod color;
mod filter;
mod product;

pub use color::*;
pub use filter::*;
pub use product::*;
