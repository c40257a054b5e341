//! Filter predicates: `field<op>value[,value...]`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::error::QueryError;
use super::path::ToPath;
use super::registry::Registry;

static PREDICATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z_]+)(.*)$").expect("predicate pattern must compile"));

/// One user filter.
///
/// `name` is the field exactly as typed; `value` is everything after it,
/// operator included (`=`, `<`, `>`, `<>`, `^`, `~~`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub name: String,
    pub value: String,
}

/// Split raw input into field name and operand, rejecting an empty operand.
fn split(raw: &str) -> Option<(&str, &str)> {
    let caps = PREDICATE.captures(raw)?;
    let name = caps.get(1)?.as_str();
    let operand = caps.get(2)?.as_str();
    if operand.is_empty() {
        return None;
    }
    Some((name, operand))
}

impl Predicate {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parse a raw filter string. The field name keeps its case.
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        split(raw)
            .map(|(name, value)| Predicate::new(name, value))
            .ok_or_else(|| QueryError::MalformedPredicate(raw.to_string()))
    }

    /// Parse every filter in order. The first failure aborts the whole batch.
    pub fn parse_all<S: AsRef<str>>(raws: &[S]) -> Result<Vec<Self>, QueryError> {
        raws.iter().map(|raw| Self::parse(raw.as_ref())).collect()
    }
}

impl ToPath for Predicate {
    fn to_path(&self) -> String {
        format!("/{}{}", self.name, self.value)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.value)
    }
}

impl Registry {
    /// Validate a raw filter string against this registry.
    ///
    /// The operand is split on `,`, `=` is stripped from each piece, and every
    /// piece has to satisfy the field's validator.
    pub fn check(&self, raw: &str) -> Result<(), QueryError> {
        let (name, operand) =
            split(raw).ok_or_else(|| QueryError::MalformedPredicate(raw.to_string()))?;

        let rule = self
            .lookup(name)
            .ok_or_else(|| QueryError::UnknownField(name.to_string()))?;

        for piece in operand.split(',') {
            let piece = piece.replace('=', "");
            if !rule.validator.validate(&piece) {
                return Err(QueryError::InvalidOperand {
                    field: name.to_string(),
                    value: piece,
                    help: rule.help().to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn is_valid(&self, raw: &str) -> bool {
        self.check(raw).is_ok()
    }
}
