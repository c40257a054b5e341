//! Registry of filterable fields and the validator each one uses.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::operand::{
    ExactMatchValidator, GeneralValidator, ObjectIdValidator, OperandValidator, PatternFamily,
};

pub const REF_FRAME_VALUES: &[&str] = &[
    "EME2000", "GCRF", "ICRF", "ITRF2000", "ITRF-93", "ITRF-97", "MCI", "TDR", "TEME", "TOD",
];

pub const TIME_SYSTEM_VALUES: &[&str] = &["UTC", "TAI", "TT", "GPS", "TDB", "TCB"];

pub const MEAN_ELEMENT_THEORY_VALUES: &[&str] = &["SGP4", "DSST", "USM"];

const CCSDS_OMM_VERS_HELP: &str = "Version number of the document, it has to be of the format x.y";

const REF_FRAME_HELP: &str = "Possible values are:
	EME2000: Earth Mean Equator and Equinox of J2000
	GCRF: Geocentric Celestial Reference Frame
	ICRF: International Celestial Reference Frame
	ITRF2000: International Terrestrial Reference Frame 2000
	ITRF-93: International Terrestrial Reference Frame 1993
	ITRF-97: International Terrestrial Reference Frame 1997
	MCI: Mars Centered Inertial
	TDR: True of Date, Rotating
	TEME: True Equator Mean Equinox
	TOD: True of Date";

const TIME_SYSTEM_HELP: &str = "Possible values are:
	UTC: Universal Coordinated Time
	TAI: International Atomic Time
	TT: Terrestrial Time
	GPS: GPS Control Segment
	TDB: Barycentric Dynamical Time
	TCB: Barycentric Coordinate Time";

const MEAN_ELEMENT_THEORY_HELP: &str = "Description of the mean element theory. \
Indicates the proper method to employ to propagate the state. Possible values are SGP4, DSST, USM";

/// A filterable field: its validator plus the help shown when a value is rejected.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub validator: OperandValidator,
}

impl FieldRule {
    fn new(validator: impl Into<OperandValidator>) -> Self {
        Self {
            validator: validator.into(),
        }
    }

    pub fn help(&self) -> &'static str {
        self.validator.help()
    }
}

/// Mapping from uppercase field name to its [`FieldRule`].
///
/// Built once and read-only afterwards. Lookups are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    rules: HashMap<&'static str, FieldRule>,
}

static GP_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::gp);

impl Registry {
    /// An empty registry; every field is rejected.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add (or replace) a field. Names are stored uppercase.
    pub fn with_field(mut self, name: &'static str, validator: impl Into<OperandValidator>) -> Self {
        debug_assert_eq!(name, name.to_uppercase(), "field names are registered uppercase");
        self.rules.insert(name, FieldRule::new(validator));
        self
    }

    /// Filterable fields of the general perturbations (`gp`) class.
    pub fn gp() -> Self {
        use PatternFamily::*;

        let text = |help: &'static str| GeneralValidator::new(Text, help);
        let date = |help: &'static str| GeneralValidator::new(Date, help);
        let number = |help: &'static str| GeneralValidator::new(Number, help);

        Self::empty()
            .with_field("CCSDS_OMM_VERS", GeneralValidator::new(Version, CCSDS_OMM_VERS_HELP))
            .with_field("COMMENT", text("Simple match of the comment field inside of the predicate"))
            .with_field(
                "CREATION_DATE",
                date("Creation date field which identifies the origin of the orbit object"),
            )
            .with_field(
                "ORIGINATOR",
                text("Creating agency or operator (value should be specified in an ICD)"),
            )
            .with_field(
                "OBJECT_NAME",
                text("Spacecraft name for which the orbit state is provided. There is no specific format."),
            )
            .with_field(
                "OBJECT_ID",
                ObjectIdValidator::new(
                    "ObjectID representing the orbital object in the format YYYY-NNNP[P] like 2000-052A",
                ),
            )
            .with_field(
                "CENTER_NAME",
                text("Origin of the reference frame, which may be a natural solar system body. For example: EARTH, MOON, SUN..."),
            )
            .with_field("REF_FRAME", ExactMatchValidator::new(REF_FRAME_VALUES, REF_FRAME_HELP))
            .with_field("TIME_SYSTEM", ExactMatchValidator::new(TIME_SYSTEM_VALUES, TIME_SYSTEM_HELP))
            .with_field(
                "MEAN_ELEMENT_THEORY",
                ExactMatchValidator::new(MEAN_ELEMENT_THEORY_VALUES, MEAN_ELEMENT_THEORY_HELP),
            )
            .with_field("EPOCH", date("Epoch of state vector and optional Keplerian elements"))
            .with_field("MEAN_MOTION", number("Mean motion in revolutions per day"))
            .with_field(
                "ECCENTRICITY",
                number("Eccentricity: https://en.wikipedia.org/wiki/Orbital_eccentricity"),
            )
            .with_field("INCLINATION", number("Inclination of the object in the orbit"))
            .with_field("RA_OF_ASC_NODE", number("Right ascension of ascending node"))
            .with_field("ARG_OF_PERICENTER", number("Argument of pericenter"))
            .with_field("COUNTRY_CODE", text("Country Code"))
            .with_field("DECAY_DATE", date("Orbital decay"))
    }

    /// Process-wide `gp` registry.
    pub fn global() -> &'static Registry {
        &GP_REGISTRY
    }

    pub fn lookup(&self, field: &str) -> Option<&FieldRule> {
        self.rules.get(field.to_uppercase().as_str())
    }

    /// Help text for a field, or an empty string when it is not filterable.
    pub fn help_for(&self, field: &str) -> &'static str {
        self.lookup(field).map(FieldRule::help).unwrap_or("")
    }

    /// Registered field names, sorted.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<_> = self.rules.keys().copied().collect();
        fields.sort_unstable();
        fields
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
