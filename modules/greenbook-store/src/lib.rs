//! Postgres read-side implementations of the event-handler store traits.
//!
//! Read-only: the request path owns writes; handlers only ever look
//! records up.

pub mod store;

pub use store::PgStore;
