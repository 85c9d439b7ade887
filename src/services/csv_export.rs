//! CSV export of visitor records
//!
//! Encodes a filtered set of visitor fields into RFC-4180 text: a header
//! row of the enabled fields in canonical order followed by one row per
//! visitor in input order. Escaping is delegated to the `csv` crate
//! (quote only when a field contains a quote, comma, or newline; double
//! internal quotes).

use crate::domain::Visitor;
use crate::services::format::capitalize;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// The 13 exportable visitor fields, in canonical column order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvField {
    VisitorId,
    Name,
    Email,
    Phone,
    InterestLevel,
    CheckInTime,
    Source,
    FollowUpGenerated,
    FollowUpSent,
    FollowUpSentAt,
    Notes,
    CreatedAt,
    UpdatedAt,
}

/// Canonical column order; the header and every row follow this
pub const CSV_FIELD_ORDER: [CsvField; 13] = [
    CsvField::VisitorId,
    CsvField::Name,
    CsvField::Email,
    CsvField::Phone,
    CsvField::InterestLevel,
    CsvField::CheckInTime,
    CsvField::Source,
    CsvField::FollowUpGenerated,
    CsvField::FollowUpSent,
    CsvField::FollowUpSentAt,
    CsvField::Notes,
    CsvField::CreatedAt,
    CsvField::UpdatedAt,
];

impl CsvField {
    pub fn header(&self) -> &'static str {
        match self {
            CsvField::VisitorId => "Visitor ID",
            CsvField::Name => "Name",
            CsvField::Email => "Email",
            CsvField::Phone => "Phone",
            CsvField::InterestLevel => "Interest Level",
            CsvField::CheckInTime => "Check-In Time",
            CsvField::Source => "Source",
            CsvField::FollowUpGenerated => "Follow-Up Generated",
            CsvField::FollowUpSent => "Follow-Up Sent",
            CsvField::FollowUpSentAt => "Follow-Up Sent At",
            CsvField::Notes => "Notes",
            CsvField::CreatedAt => "Created At",
            CsvField::UpdatedAt => "Updated At",
        }
    }
}

fn default_on() -> bool {
    true
}

/// Per-field export toggles with merge-with-defaults semantics
///
/// Every field defaults to enabled, so deserializing an empty table is
/// identical to [`CsvFieldConfig::default`]. Callers toggle off only the
/// columns they want dropped.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CsvFieldConfig {
    pub visitor_id: bool,
    pub name: bool,
    pub email: bool,
    pub phone: bool,
    pub interest_level: bool,
    pub check_in_time: bool,
    pub source: bool,
    pub follow_up_generated: bool,
    pub follow_up_sent: bool,
    pub follow_up_sent_at: bool,
    pub notes: bool,
    pub created_at: bool,
    pub updated_at: bool,
}

impl Default for CsvFieldConfig {
    fn default() -> Self {
        Self {
            visitor_id: default_on(),
            name: default_on(),
            email: default_on(),
            phone: default_on(),
            interest_level: default_on(),
            check_in_time: default_on(),
            source: default_on(),
            follow_up_generated: default_on(),
            follow_up_sent: default_on(),
            follow_up_sent_at: default_on(),
            notes: default_on(),
            created_at: default_on(),
            updated_at: default_on(),
        }
    }
}

impl CsvFieldConfig {
    fn enabled(&self, field: CsvField) -> bool {
        match field {
            CsvField::VisitorId => self.visitor_id,
            CsvField::Name => self.name,
            CsvField::Email => self.email,
            CsvField::Phone => self.phone,
            CsvField::InterestLevel => self.interest_level,
            CsvField::CheckInTime => self.check_in_time,
            CsvField::Source => self.source,
            CsvField::FollowUpGenerated => self.follow_up_generated,
            CsvField::FollowUpSent => self.follow_up_sent,
            CsvField::FollowUpSentAt => self.follow_up_sent_at,
            CsvField::Notes => self.notes,
            CsvField::CreatedAt => self.created_at,
            CsvField::UpdatedAt => self.updated_at,
        }
    }

    /// Enabled fields in canonical order
    pub fn enabled_fields(&self) -> Vec<CsvField> {
        CSV_FIELD_ORDER.iter().copied().filter(|f| self.enabled(*f)).collect()
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn optional_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.to_rfc3339()).unwrap_or_default()
}

/// Render one visitor field as its CSV cell value
///
/// Absent optionals render as empty fields, never as a "null" literal.
fn field_value(visitor: &Visitor, field: CsvField) -> String {
    match field {
        CsvField::VisitorId => visitor.visitor_id.to_string(),
        CsvField::Name => visitor.name.clone(),
        CsvField::Email => visitor.email.clone(),
        CsvField::Phone => visitor.phone.clone(),
        CsvField::InterestLevel => capitalize(visitor.interest_level.as_str()),
        CsvField::CheckInTime => visitor.check_in_time.to_rfc3339(),
        CsvField::Source => capitalize(visitor.source.as_str()),
        CsvField::FollowUpGenerated => yes_no(visitor.follow_up_generated).to_string(),
        CsvField::FollowUpSent => yes_no(visitor.follow_up_sent).to_string(),
        CsvField::FollowUpSentAt => optional_timestamp(visitor.follow_up_sent_at),
        CsvField::Notes => visitor.notes.clone().unwrap_or_default(),
        CsvField::CreatedAt => visitor.created_at.to_rfc3339(),
        CsvField::UpdatedAt => visitor.updated_at.to_rfc3339(),
    }
}

/// Encode visitors as a finished CSV string
///
/// The result is a complete UTF-8 document; turning it into a
/// downloadable byte buffer is the caller's job.
pub fn generate_visitor_csv(
    visitors: &[Visitor],
    config: &CsvFieldConfig,
) -> anyhow::Result<String> {
    let fields = config.enabled_fields();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(fields.iter().map(|f| f.header()))
        .context("Failed to write CSV header")?;

    for visitor in visitors {
        writer
            .write_record(fields.iter().map(|f| field_value(visitor, *f)))
            .with_context(|| format!("Failed to write CSV row for {}", visitor.visitor_id))?;
    }

    let bytes = writer.into_inner().context("Failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}
