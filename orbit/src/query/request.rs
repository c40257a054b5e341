//! Full request paths: `/{controller}/{action}/class/{class}` plus the query.

use std::fmt;
use std::str::FromStr;

use super::error::QueryError;
use super::path::{assemble, Format, Limit, OrderBy, SORTABLE_GP_FIELDS};
use super::predicate::Predicate;

pub const SORTABLE_DECAY_FIELDS: &[&str] = &[
    "NORAD_CAT_ID",
    "OBJECT_NUMBER",
    "OBJECT_NAME",
    "INTLDES",
    "OBJECT_ID",
    "RCS",
    "RCS_SIZE",
    "COUNTRY",
    "MSG_EPOCH",
    "DECAY_EPOCH",
    "SOURCE",
    "MSG_TYPE",
    "PRECEDENCE",
];

pub const SORTABLE_CDM_FIELDS: &[&str] = &[
    "CDM_ID",
    "CREATED",
    "EMERGENCY_REPORTABLE",
    "TCA",
    "MIN_RNG",
    "PC",
    "SAT_1_ID",
    "SAT_1_NAME",
    "SAT1_OBJECT_TYPE",
    "SAT1_RCS",
    "SAT_1_EXCL_VOL",
    "SAT_2_ID",
    "SAT_2_NAME",
    "SAT2_OBJECT_TYPE",
    "SAT2_RCS",
    "SAT_2_EXCL_VOL",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestController {
    #[default]
    BasicSpaceData,
    ExpandedSpaceData,
}

impl RequestController {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestController::BasicSpaceData => "basicspacedata",
            RequestController::ExpandedSpaceData => "expandedspacedata",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestAction {
    #[default]
    Query,
    ModelDef,
}

impl RequestAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestAction::Query => "query",
            RequestAction::ModelDef => "modeldef",
        }
    }
}

/// Data class being queried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RequestClass {
    /// General perturbations (orbital elements).
    #[default]
    Gp,
    /// Decay messages.
    Decay,
    /// Public conjunction data messages.
    CdmPublic,
}

impl RequestClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestClass::Gp => "gp",
            RequestClass::Decay => "decay",
            RequestClass::CdmPublic => "cdm_public",
        }
    }

    /// Fields accepted by `orderby` for this class.
    pub fn sortable_fields(&self) -> &'static [&'static str] {
        match self {
            RequestClass::Gp => SORTABLE_GP_FIELDS,
            RequestClass::Decay => SORTABLE_DECAY_FIELDS,
            RequestClass::CdmPublic => SORTABLE_CDM_FIELDS,
        }
    }

    /// Short tag used in persisted file names.
    pub fn file_tag(&self) -> &'static str {
        match self {
            RequestClass::Gp => "gp",
            RequestClass::Decay => "decay",
            RequestClass::CdmPublic => "cdm",
        }
    }
}

impl fmt::Display for RequestClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestClass {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gp" => Ok(RequestClass::Gp),
            "decay" => Ok(RequestClass::Decay),
            "cdm" | "cdm_public" => Ok(RequestClass::CdmPublic),
            _ => Err(QueryError::UnknownClass(s.to_string())),
        }
    }
}

/// Everything needed to build one request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceRequest {
    pub controller: RequestController,
    pub action: RequestAction,
    pub class: RequestClass,
    pub predicates: Vec<Predicate>,
    pub format: Format,
    pub limit: Limit,
    pub order_by: Option<OrderBy>,
    pub show_empty_result: bool,
}

impl SpaceRequest {
    pub fn new(class: RequestClass) -> Self {
        Self {
            controller: RequestController::default(),
            action: RequestAction::default(),
            class,
            predicates: Vec::new(),
            format: Format::Json,
            limit: Limit::default(),
            order_by: None,
            show_empty_result: true,
        }
    }

    pub fn with_predicates(mut self, predicates: Vec<Predicate>) -> Self {
        self.predicates = predicates;
        self
    }

    pub fn with_limit(mut self, limit: Limit) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// The `orderby` segment for this class, empty when absent or not sortable.
    pub fn order_by_path(&self) -> String {
        self.order_by
            .as_ref()
            .map(|o| o.to_path_within(self.class.sortable_fields()))
            .unwrap_or_default()
    }

    /// Query part only: predicates through `emptyresult/show`.
    pub fn build_query(&self) -> String {
        assemble(
            &self.predicates,
            self.order_by_path(),
            self.format,
            self.limit,
            self.show_empty_result,
        )
    }

    /// Controller, action and class prefix, e.g. `/basicspacedata/query/class/gp`.
    pub fn endpoint(&self) -> String {
        format!(
            "/{}/{}/class/{}",
            self.controller.as_str(),
            self.action.as_str(),
            self.class.as_str()
        )
    }

    /// Endpoint followed by the query, ready to append to the base URL.
    pub fn path(&self) -> String {
        format!("{}{}", self.endpoint(), self.build_query())
    }
}
