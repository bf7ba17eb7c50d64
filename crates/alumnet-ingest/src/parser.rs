//! Record parser for one tab-delimited export line
//!
//! Column positions are fixed by the registry export schema. Parsing fails
//! closed: a malformed line yields a [`SkipReason`] rather than an error or
//! a partial record, and the caller decides how to log it.

use thiserror::Error;

use crate::alumni_id;
use crate::config::ImportConfig;
use crate::normalize::{derive_year, optional_text, parse_date};
use crate::record::{AlumniRecord, Sex};

// Positional columns of the registry export.
pub mod columns {
    pub const SEQUENCE_ID: usize = 0;
    pub const ADMISSION_NUMBER: usize = 1;
    pub const ADMISSION_DATE: usize = 2;
    pub const FULL_NAME: usize = 3;
    pub const DATE_OF_BIRTH: usize = 4;
    pub const SEX: usize = 5;
    pub const PROFILE_PICTURE_URL: usize = 6;
    pub const BIOGRAPHY: usize = 7;
    pub const FIELD_OF_STUDY: usize = 8;
    pub const PHONE: usize = 9;
    pub const EMAIL: usize = 10;
    pub const FACEBOOK: usize = 11;
    pub const TWITTER: usize = 12;
    pub const LINKEDIN: usize = 13;
    pub const CURRENT_POSITION: usize = 14;
    pub const CURRENT_COMPANY: usize = 15;
    pub const PARENT_GUARDIAN_NAMES: usize = 16;
    pub const NOTE: usize = 17;
    pub const ADDRESS_AT_SCHOOL: usize = 18;
    pub const LAST_SCHOOL_ATTENDED: usize = 19;
    pub const GRADUATION_DATE: usize = 20;
    /// Legacy combined cell; present in newer exports only.
    pub const COMBINED_FIELDS: usize = 21;
}

/// Columns a line must have to be parseable. The trailing combined-fields
/// cell is optional.
pub const MIN_COLUMNS: usize = 21;

/// Why a source line was skipped instead of producing a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("line has {found} columns, expected at least {}", MIN_COLUMNS)]
    TooFewColumns { found: usize },

    #[error("missing full name")]
    MissingFullName,
}

/// Parse one source line into an [`AlumniRecord`].
///
/// The line is split on tabs and every cell normalized. A line with too few
/// columns or a blank/sentinel full-name cell is skipped with a reason;
/// nothing here panics or raises.
pub fn parse_line(line: &str, config: &ImportConfig) -> Result<AlumniRecord, SkipReason> {
    let cells: Vec<&str> = line.split('\t').collect();
    if cells.len() < MIN_COLUMNS {
        return Err(SkipReason::TooFewColumns { found: cells.len() });
    }

    let full_name = match optional_text(cells[columns::FULL_NAME]) {
        Some(name) => name,
        None => return Err(SkipReason::MissingFullName),
    };

    let admission_number = optional_text(cells[columns::ADMISSION_NUMBER]);
    // The registry falls back to the sequence cell when the admission number
    // was never recorded; identifiers stay stable either way because both
    // columns are fixed in the export.
    let id_segment = admission_number
        .clone()
        .or_else(|| optional_text(cells[columns::SEQUENCE_ID]))
        .unwrap_or_default();
    let alumni_id = alumni_id::generate(&id_segment, config);

    let graduation_date = parse_date(cells[columns::GRADUATION_DATE]);

    Ok(AlumniRecord {
        alumni_id,
        institution_id: config.institution_id,
        admission_number,
        admission_date: parse_date(cells[columns::ADMISSION_DATE]),
        full_name,
        date_of_birth: parse_date(cells[columns::DATE_OF_BIRTH]),
        sex: Sex::from_cell(cells[columns::SEX]),
        profile_picture_url: optional_text(cells[columns::PROFILE_PICTURE_URL]),
        biography: optional_text(cells[columns::BIOGRAPHY]),
        field_of_study: optional_text(cells[columns::FIELD_OF_STUDY]),
        phone: optional_text(cells[columns::PHONE]),
        email: optional_text(cells[columns::EMAIL]),
        facebook_handle: optional_text(cells[columns::FACEBOOK]),
        twitter_handle: optional_text(cells[columns::TWITTER]),
        linkedin_handle: optional_text(cells[columns::LINKEDIN]),
        current_position: optional_text(cells[columns::CURRENT_POSITION]),
        current_company: optional_text(cells[columns::CURRENT_COMPANY]),
        parent_guardian_names: optional_text(cells[columns::PARENT_GUARDIAN_NAMES]),
        note: optional_text(cells[columns::NOTE]),
        address_at_school: optional_text(cells[columns::ADDRESS_AT_SCHOOL]),
        last_school_attended: optional_text(cells[columns::LAST_SCHOOL_ATTENDED]),
        graduation_date,
        graduation_year: derive_year(graduation_date),
        combined_fields: cells
            .get(columns::COMBINED_FIELDS)
            .and_then(|cell| optional_text(cell)),
    })
}
