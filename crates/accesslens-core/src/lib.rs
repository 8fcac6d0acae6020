//! Accesslens Core - data model, wire protocol, schema, and error handling

pub mod config;
pub mod error;
pub mod protocol;
pub mod schema;
pub mod sink;
pub mod types;

pub use error::{Error, Result};
pub use protocol::*;
pub use schema::ProviderSchema;
pub use sink::ResourceSink;
pub use types::*;
