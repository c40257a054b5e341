//! Query building for the space-track.org REST API.
//!
//! # Filter Syntax
//!
//! A filter is `field<op>value[,value...]`, for example:
//!
//! - `epoch>now-30`: relative dates
//! - `decay_date<>null-val`: not-null check
//! - `inclination50--60`: inclusive numeric range
//! - `object_id=1998-067A,^2000`: alternation, `^` is "starts with"
//! - `object_name~~starlink`: `~~` is "contains"
//!
//! Every filter is validated against a [`Registry`] before any request is
//! built; the path is then assembled in the order the service expects:
//! predicates, `orderby`, `limit`, `format`, `emptyresult/show`.

mod error;
pub mod operand;
mod path;
mod predicate;
pub mod registry;
mod request;

pub use error::QueryError;
pub use operand::{OperandValidator, PatternFamily};
pub use path::{build_query, Format, Limit, OrderBy, Sort, ToPath, SORTABLE_GP_FIELDS};
pub use predicate::Predicate;
pub use registry::{FieldRule, Registry};
pub use request::{
    RequestAction, RequestClass, RequestController, SpaceRequest, SORTABLE_CDM_FIELDS,
    SORTABLE_DECAY_FIELDS,
};
