//! The canonical alumni record written to the store

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sex as recorded in the registry. Anything other than an exact `M` or `F`
/// cell is treated as unrecorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    M,
    F,
}

impl Sex {
    /// Map a raw cell to the enum; `None` for anything but exact `M`/`F`.
    pub fn from_cell(raw: &str) -> Option<Self> {
        match raw.trim() {
            "M" => Some(Sex::M),
            "F" => Some(Sex::F),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sex::M => "M",
            Sex::F => "F",
        }
    }
}

/// One normalized alumni record, ready for a bulk-insert call.
///
/// Full name is the only mandatory field; everything else survives the
/// legacy export as-is after sentinel/whitespace normalization. The record
/// is created once by the parser and never mutated afterwards — the only
/// later write is the backfill pipeline touching the derived graduation
/// year in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlumniRecord {
    /// Derived identifier, unique in the store
    pub alumni_id: String,

    /// Store identifier of the owning institution
    pub institution_id: i64,

    pub admission_number: Option<String>,
    pub admission_date: Option<NaiveDate>,

    /// Required, non-blank
    pub full_name: String,

    pub date_of_birth: Option<NaiveDate>,
    pub sex: Option<Sex>,

    pub profile_picture_url: Option<String>,
    pub biography: Option<String>,
    pub field_of_study: Option<String>,

    pub phone: Option<String>,
    pub email: Option<String>,

    pub facebook_handle: Option<String>,
    pub twitter_handle: Option<String>,
    pub linkedin_handle: Option<String>,

    pub current_position: Option<String>,
    pub current_company: Option<String>,

    pub parent_guardian_names: Option<String>,
    pub note: Option<String>,
    pub address_at_school: Option<String>,
    pub last_school_attended: Option<String>,

    pub graduation_date: Option<NaiveDate>,
    /// Derived from `graduation_date` at parse time
    pub graduation_year: Option<i32>,

    /// Legacy carry-over cell the export appends after the schema columns
    pub combined_fields: Option<String>,
}
