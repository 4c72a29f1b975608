//! The GraphQL request dispatcher.
//!
//! This is the leaf layer every domain operation depends on: it turns a
//! query string plus an optional variables mapping into a single outbound
//! HTTPS POST against the store's Admin GraphQL endpoint, and returns the
//! parsed response envelope without interpreting it.

mod dispatcher;
mod envelope;
mod errors;

pub use dispatcher::{GraphqlDispatcher, REQUEST_TIMEOUT};
pub use envelope::{ResponseEnvelope, TopLevelError};
pub use errors::DispatchError;
