//! Operand validators for filter values.
//!
//! An operand is the part of a filter after the field name, with its leading
//! `=` stripped and split on `,`. Each filterable field owns exactly one
//! validator; a value is accepted when the validator accepts it.

use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;

/// Year of the first catalogued launch (Sputnik 1, 1957-001B).
pub const FIRST_LAUNCH_YEAR: i32 = 1957;

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("operand pattern must compile")
}

static NUMBER: LazyLock<Regex> = LazyLock::new(|| pattern(r"^(\^|~~|<|>)?\d+(\.\d+)?$"));
static NUMBER_RANGE: LazyLock<Regex> = LazyLock::new(|| pattern(r"^\d+(\.\d+)?--\d+(\.\d+)?$"));

static TEXT: LazyLock<Regex> = LazyLock::new(|| pattern(r"^(\^|~~)?[\p{L}_ /-]+$"));

static DATE: LazyLock<Regex> = LazyLock::new(|| pattern(r"^\d{4}-\d{2}-\d{2}$"));
static DATE_TIME: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$"));
static DATE_RELATIVE: LazyLock<Regex> = LazyLock::new(|| pattern(r"^(>|<)?now(-\d+(\.\d+)?)?$"));
static DATE_RELATIVE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^now(-\d+(\.\d+)?)?--now(-\d+(\.\d+)?)?$"));
static NULL_VALUE: LazyLock<Regex> = LazyLock::new(|| pattern(r"^(<>)?null-val$"));

static VERSION: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[0-2]\.\d$"));

static OBJECT_ID: LazyLock<Regex> = LazyLock::new(|| pattern(r"^(\^|~~)?(\d{4})-\d{3}[A-Z]{1,2}$"));
static OBJECT_ID_YEAR: LazyLock<Regex> = LazyLock::new(|| pattern(r"^(\^|~~|<|>)?(\d+)"));

/// Family of patterns a [`GeneralValidator`] is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternFamily {
    /// Plain or prefixed numbers and `N--M` ranges.
    Number,
    /// Free text: letters, underscore, space, hyphen and slash.
    Text,
    /// Absolute dates, `now` expressions and the `null-val` sentinel.
    Date,
    /// CCSDS document version `x.y`.
    Version,
}

impl PatternFamily {
    fn patterns(self) -> Vec<&'static Regex> {
        match self {
            PatternFamily::Number => vec![&*NUMBER, &*NUMBER_RANGE],
            PatternFamily::Text => vec![&*TEXT],
            PatternFamily::Date => vec![
                &*DATE,
                &*DATE_TIME,
                &*DATE_RELATIVE,
                &*DATE_RELATIVE_RANGE,
                &*NULL_VALUE,
            ],
            PatternFamily::Version => vec![&*VERSION],
        }
    }
}

/// Accepts input matching any of its patterns.
#[derive(Debug, Clone)]
pub struct GeneralValidator {
    patterns: Vec<&'static Regex>,
    help: &'static str,
}

impl GeneralValidator {
    pub fn new(family: PatternFamily, help: &'static str) -> Self {
        Self {
            patterns: family.patterns(),
            help,
        }
    }

    pub fn validate(&self, input: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(input))
    }
}

/// Accepts input that, uppercased, equals one of a fixed set of values.
#[derive(Debug, Clone)]
pub struct ExactMatchValidator {
    values: &'static [&'static str],
    help: &'static str,
}

impl ExactMatchValidator {
    pub fn new(values: &'static [&'static str], help: &'static str) -> Self {
        Self { values, help }
    }

    pub fn validate(&self, input: &str) -> bool {
        let upper = input.to_uppercase();
        self.values.iter().any(|v| *v == upper)
    }

    pub fn values(&self) -> &'static [&'static str] {
        self.values
    }
}

/// Accepts international designators (`YYYY-NNNP[P]`) and bare year
/// comparisons, as long as the year falls between the first launch and now.
#[derive(Debug, Clone)]
pub struct ObjectIdValidator {
    help: &'static str,
}

impl ObjectIdValidator {
    pub fn new(help: &'static str) -> Self {
        Self { help }
    }

    pub fn validate(&self, input: &str) -> bool {
        self.validate_for_year(input, chrono::Utc::now().year())
    }

    /// Validate against an explicit current year.
    pub fn validate_for_year(&self, input: &str, current_year: i32) -> bool {
        if let Some(caps) = OBJECT_ID.captures(input) {
            return year_in_range(&caps[2], current_year);
        }
        if let Some(caps) = OBJECT_ID_YEAR.captures(input) {
            return year_in_range(&caps[2], current_year);
        }
        false
    }
}

fn year_in_range(year: &str, current_year: i32) -> bool {
    match year.parse::<i32>() {
        Ok(year) => (FIRST_LAUNCH_YEAR..=current_year).contains(&year),
        Err(_) => false,
    }
}

/// Validator attached to a filterable field.
#[derive(Debug, Clone)]
pub enum OperandValidator {
    General(GeneralValidator),
    ExactMatch(ExactMatchValidator),
    ObjectId(ObjectIdValidator),
}

impl OperandValidator {
    pub fn validate(&self, input: &str) -> bool {
        match self {
            OperandValidator::General(v) => v.validate(input),
            OperandValidator::ExactMatch(v) => v.validate(input),
            OperandValidator::ObjectId(v) => v.validate(input),
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            OperandValidator::General(v) => v.help,
            OperandValidator::ExactMatch(v) => v.help,
            OperandValidator::ObjectId(v) => v.help,
        }
    }
}

impl From<GeneralValidator> for OperandValidator {
    fn from(v: GeneralValidator) -> Self {
        OperandValidator::General(v)
    }
}

impl From<ExactMatchValidator> for OperandValidator {
    fn from(v: ExactMatchValidator) -> Self {
        OperandValidator::ExactMatch(v)
    }
}

impl From<ObjectIdValidator> for OperandValidator {
    fn from(v: ObjectIdValidator) -> Self {
        OperandValidator::ObjectId(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIME_SYSTEMS: &[&str] = &["UTC", "TAI", "TT", "GPS", "TDB", "TCB"];

    #[test]
    fn test_number_family() {
        let v = GeneralValidator::new(PatternFamily::Number, "numbers");
        for ok in ["12", "12.5", "<3", ">0.001", "^15", "~~15.2", "1--2", "1.5--20.25"] {
            assert!(v.validate(ok), "{ok} should be accepted");
        }
        for bad in ["", "abc", "1a", ">x", "1--", "--2", "1.--2", "<>3"] {
            assert!(!v.validate(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_text_family() {
        let v = GeneralValidator::new(PatternFamily::Text, "text");
        assert!(v.validate("single comment"));
        assert!(v.validate("^another one"));
        assert!(v.validate("~~hey there"));
        assert!(v.validate("EARTH"));
        assert!(v.validate("STARLINK-DEB/ROCKET_BODY"));
        assert!(v.validate("Ñandú"));
        assert!(!v.validate(">singlet comment"));
        assert!(!v.validate("ISS 25544"));
        assert!(!v.validate(""));
    }

    #[test]
    fn test_date_family() {
        let v = GeneralValidator::new(PatternFamily::Date, "dates");
        for ok in [
            "2022-01-31",
            "2022-01-31 10:20:30",
            "now",
            ">now-30",
            "<now-1.5",
            "now-10--now",
            "now-10--now-2.5",
            "null-val",
            "<>null-val",
        ] {
            assert!(v.validate(ok), "{ok} should be accepted");
        }
        for bad in ["2022-1-31", "yesterday", "now+1", ">null-val", "2022-01-31T10:20:30"] {
            assert!(!v.validate(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_version_family() {
        let v = GeneralValidator::new(PatternFamily::Version, "version");
        assert!(v.validate("2.0"));
        assert!(v.validate("0.9"));
        assert!(!v.validate("3.0"));
        assert!(!v.validate("2.10"));
    }

    #[test]
    fn test_exact_match_case_insensitive() {
        let v = ExactMatchValidator::new(TIME_SYSTEMS, "time systems");
        for value in v.values() {
            assert!(v.validate(value));
            assert!(v.validate(&value.to_lowercase()));
        }
        assert!(!v.validate("notexistent"));
        assert_eq!(v.help, "time systems");
    }

    #[test]
    fn test_object_id() {
        let v = ObjectIdValidator::new("some helper text here");
        let cases = [
            ("1960-000A", true),
            ("^1998-067A", true),
            ("~~2000-052AB", true),
            ("1956-000A", false),
            ("4000-000A", false),
            (">1960", true),
            (">1950", false),
            ("<4000", false),
            ("notvalidinput", false),
        ];
        for (input, want) in cases {
            assert_eq!(v.validate_for_year(input, 2024), want, "input {input}");
        }
        assert_eq!(OperandValidator::from(v).help(), "some helper text here");
    }

    #[test]
    fn test_object_id_year_bounds() {
        let v = ObjectIdValidator::new("");
        assert!(v.validate_for_year("1957-001B", 2024));
        assert!(v.validate_for_year("2024-001A", 2024));
        assert!(!v.validate_for_year("2025-001A", 2024));
        assert!(v.validate(&format!("{}-001A", chrono::Utc::now().year())));
    }

    #[test]
    fn test_year_not_a_number() {
        assert!(!year_in_range("notarealnumber", 2024));
        assert!(!year_in_range("99999999999999999999", 2024));
    }
}
