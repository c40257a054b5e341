//! Row records returned by space-track.
//!
//! Each class decodes into its typed record first so every row carries the
//! same columns in the same order, then is flattened to a [`Row`] for the codec.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::query::RequestClass;
use crate::Result;

/// One flat record: column name to value, in column order.
pub type Row = Map<String, Value>;

/// General perturbations element set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct GpRecord {
    pub ccsds_omm_vers: Option<String>,
    pub comment: Option<String>,
    pub creation_date: Option<String>,
    pub originator: Option<String>,
    pub object_name: Option<String>,
    pub object_id: Option<String>,
    pub center_name: Option<String>,
    pub ref_frame: Option<String>,
    pub time_system: Option<String>,
    pub mean_element_theory: Option<String>,
    pub epoch: Option<String>,
    pub mean_motion: Option<String>,
    pub eccentricity: Option<String>,
    pub inclination: Option<String>,
    pub ra_of_asc_node: Option<String>,
    pub arg_of_pericenter: Option<String>,
    pub mean_anomaly: Option<String>,
    pub ephemeris_type: Option<String>,
    pub classification_type: Option<String>,
    pub norad_cat_id: Option<String>,
    pub element_set_no: Option<String>,
    pub rev_at_epoch: Option<String>,
    pub bstar: Option<String>,
    pub mean_motion_dot: Option<String>,
    pub mean_motion_ddot: Option<String>,
    pub semimajor_axis: Option<String>,
    pub period: Option<String>,
    pub apoapsis: Option<String>,
    pub periapsis: Option<String>,
    pub object_type: Option<String>,
    pub rcs_size: Option<String>,
    pub country_code: Option<String>,
    pub launch_date: Option<String>,
    pub site: Option<String>,
    pub decay_date: Option<String>,
    pub file: Option<String>,
    pub gp_id: Option<String>,
    pub tle_line0: Option<String>,
    pub tle_line1: Option<String>,
    pub tle_line2: Option<String>,
}

/// Decay prediction or report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct DecayRecord {
    pub norad_cat_id: Option<String>,
    pub object_number: Option<String>,
    pub object_name: Option<String>,
    #[serde(rename = "INTLDES")]
    pub intldes: Option<String>,
    pub object_id: Option<String>,
    pub rcs: Option<String>,
    pub rcs_size: Option<String>,
    pub country: Option<String>,
    pub msg_epoch: Option<String>,
    pub decay_epoch: Option<String>,
    pub source: Option<String>,
    pub msg_type: Option<String>,
    pub precedence: Option<String>,
}

/// Public conjunction data message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CdmRecord {
    #[serde(rename = "CDM_ID")]
    pub cdm_id: Option<String>,
    #[serde(rename = "CREATED")]
    pub created: Option<String>,
    #[serde(rename = "EMERGENCY_REPORTABLE")]
    pub emergency_reportable: Option<String>,
    #[serde(rename = "TCA")]
    pub tca: Option<String>,
    #[serde(rename = "MIN_RNG")]
    pub min_rng: Option<String>,
    #[serde(rename = "PC")]
    pub pc: Option<String>,
    #[serde(rename = "SAT_1_ID")]
    pub sat_1_id: Option<String>,
    #[serde(rename = "SAT_1_NAME")]
    pub sat_1_name: Option<String>,
    #[serde(rename = "SAT1_OBJECT_TYPE")]
    pub sat1_object_type: Option<String>,
    #[serde(rename = "SAT1_RCS")]
    pub sat1_rcs: Option<String>,
    #[serde(rename = "SAT_1_EXCL_VOL")]
    pub sat_1_excl_vol: Option<String>,
    #[serde(rename = "SAT_2_ID")]
    pub sat_2_id: Option<String>,
    #[serde(rename = "SAT_2_NAME")]
    pub sat_2_name: Option<String>,
    #[serde(rename = "SAT2_OBJECT_TYPE")]
    pub sat2_object_type: Option<String>,
    #[serde(rename = "SAT2_RCS")]
    pub sat2_rcs: Option<String>,
    #[serde(rename = "SAT_2_EXCL_VOL")]
    pub sat_2_excl_vol: Option<String>,
}

/// Decode a JSON response body into rows for the given class.
pub fn parse_rows(class: RequestClass, body: &str) -> Result<Vec<Row>> {
    match class {
        RequestClass::Gp => rows_of::<GpRecord>(body),
        RequestClass::Decay => rows_of::<DecayRecord>(body),
        RequestClass::CdmPublic => rows_of::<CdmRecord>(body),
    }
}

fn rows_of<T>(body: &str) -> Result<Vec<Row>>
where
    T: DeserializeOwned + Serialize,
{
    let records: Vec<T> = serde_json::from_str(body)?;
    records
        .iter()
        .map(|record| match serde_json::to_value(record)? {
            Value::Object(row) => Ok(row),
            _ => Ok(Row::new()),
        })
        .collect()
}
