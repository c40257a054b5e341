//! REST path segments: ordering, limits, output format and the final query.
//!
//! Segment order is fixed by the remote service:
//! predicates, `orderby`, `limit`, `format`, then `emptyresult/show`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::QueryError;
use super::predicate::Predicate;

/// Something that contributes a `/`-prefixed segment to a request path.
/// An empty string means no contribution.
pub trait ToPath {
    fn to_path(&self) -> String;
}

/// Fields of the `gp` class that results can be ordered by.
pub const SORTABLE_GP_FIELDS: &[&str] = &[
    "CCSDS_OMM_VERS",
    "COMMENT",
    "CREATION_DATE",
    "ORIGINATOR",
    "OBJECT_NAME",
    "OBJECT_ID",
    "CENTER_NAME",
    "REF_FRAME",
    "TIME_SYSTEM",
    "MEAN_ELEMENT_THEORY",
    "EPOCH",
    "MEAN_MOTION",
    "ECCENTRICITY",
    "INCLINATION",
    "RA_OF_ASC_NODE",
    "ARG_OF_PERICENTER",
    "MEAN_ANOMALY",
    "EPHEMERIS_TYPE",
    "CLASSIFICATION_TYPE",
    "NORAD_CAT_ID",
    "ELEMENT_SET_NO",
    "REV_AT_EPOCH",
    "BSTAR",
    "MEAN_MOTION_DOT",
    "MEAN_MOTION_DDOT",
    "SEMIMAJOR_AXIS",
    "PERIOD",
    "APOAPSIS",
    "PERIAPSIS",
    "OBJECT_TYPE",
    "RCS_SIZE",
    "COUNTRY_CODE",
    "LAUNCH_DATE",
    "SITE",
    "DECAY_DATE",
    "FILE",
    "GP_ID",
    "TLE_LINE0",
    "TLE_LINE1",
    "TLE_LINE2",
];

/// Serialization format, both for the request and for persisted files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Xml,
    Csv,
    Html,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Json, Format::Xml, Format::Csv, Format::Html];

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
            Format::Csv => "csv",
            Format::Html => "html",
        }
    }

    /// File extension for persisted records.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "xml" => Ok(Format::Xml),
            "csv" => Ok(Format::Csv),
            "html" => Ok(Format::Html),
            _ => Err(QueryError::UnknownFormat(s.to_string())),
        }
    }
}

impl ToPath for Format {
    fn to_path(&self) -> String {
        format!("/format/{}", self)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Sort {
    #[default]
    Asc,
    Desc,
}

impl Sort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sort::Asc => "asc",
            Sort::Desc => "desc",
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sort {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(Sort::Asc),
            "desc" => Ok(Sort::Desc),
            _ => Err(QueryError::UnknownSort(s.to_string())),
        }
    }
}

/// `orderby` clause. `by` is emitted as typed; an unknown field yields no segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub by: String,
    pub sort: Sort,
}

impl OrderBy {
    pub fn new(by: impl Into<String>, sort: Sort) -> Self {
        Self { by: by.into(), sort }
    }

    /// Render against an explicit list of sortable fields (case-insensitive).
    pub fn to_path_within(&self, sortable: &[&str]) -> String {
        if !sortable.iter().any(|f| f.eq_ignore_ascii_case(&self.by)) {
            return String::new();
        }
        format!("/orderby/{} {}", self.by, self.sort)
    }
}

impl ToPath for OrderBy {
    fn to_path(&self) -> String {
        self.to_path_within(SORTABLE_GP_FIELDS)
    }
}

/// `limit` clause. `max <= 0` disables it; `skip` only counts when positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limit {
    pub max: i64,
    pub skip: i64,
}

impl Limit {
    pub fn new(max: i64, skip: i64) -> Self {
        Self { max, skip }
    }
}

impl ToPath for Limit {
    fn to_path(&self) -> String {
        if self.max <= 0 {
            return String::new();
        }
        if self.skip > 0 {
            format!("/limit/{},{}", self.max, self.skip)
        } else {
            format!("/limit/{}", self.max)
        }
    }
}

/// Assemble the query fragment for already validated predicates.
pub fn build_query(
    predicates: &[Predicate],
    format: Format,
    limit: Limit,
    order_by: &OrderBy,
    show_empty_result: bool,
) -> String {
    assemble(predicates, order_by.to_path(), format, limit, show_empty_result)
}

pub(crate) fn assemble(
    predicates: &[Predicate],
    order_by: String,
    format: Format,
    limit: Limit,
    show_empty_result: bool,
) -> String {
    let mut path: String = predicates.iter().map(ToPath::to_path).collect();

    path.push_str(&order_by);
    path.push_str(&limit.to_path());
    path.push_str(&format.to_path());

    if show_empty_result {
        path.push_str("/emptyresult/show");
    }

    path
}
