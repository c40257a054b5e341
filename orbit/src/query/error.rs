//! Errors raised while parsing and validating query input.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("parsing input to predicate: {0:?} is not of the form <field><operator><value>")]
    MalformedPredicate(String),

    #[error("field {0:?} can not be used as a filter")]
    UnknownField(String),

    #[error("invalid value {value:?} for field {field}\n{help}")]
    InvalidOperand {
        field: String,
        value: String,
        help: String,
    },

    #[error("unknown format {0:?}, possible values are json, xml, csv, html")]
    UnknownFormat(String),

    #[error("unknown sort {0:?}, possible values are asc, desc")]
    UnknownSort(String),

    #[error("unknown request class {0:?}, possible values are gp, decay, cdm_public")]
    UnknownClass(String),
}
