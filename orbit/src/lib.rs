//! orbit: query building and data plumbing for space-track.org
//!
//! Validates user filters against the field grammar, assembles request paths,
//! talks to the REST API and persists the returned records.

pub mod client;
pub mod codec;
pub mod config;
pub mod credentials;
pub mod error;
pub mod persist;
pub mod query;
pub mod record;

pub use client::{Credentials, Fetched, SessionCookie, SpaceTrackClient};
pub use config::{AuthConfig, Config};
pub use error::{Error, Result};
pub use persist::{PersistMode, Persister};
pub use query::{
    build_query, Format, Limit, OrderBy, Predicate, QueryError, Registry, RequestClass, Sort,
    SpaceRequest,
};
pub use record::{parse_rows, Row};
