//! End-to-end export tests: generate, write to disk, read back

use chrono::{TimeZone, Utc};
use openhouse_core::domain::{
    InterestDistribution, InterestLevel, Session, SessionId, SessionStatus, Visitor, VisitorId,
    VisitorSource,
};
use openhouse_core::io::ExportWriter;
use openhouse_core::services::governor::ExportFormat;
use openhouse_core::services::{generate_session_pdf, generate_visitor_csv, CsvFieldConfig};
use tempfile::tempdir;

fn session(visitor_count: u32) -> Session {
    Session {
        session_id: SessionId("sess-100".to_string()),
        property_address: "48 Maple Street".to_string(),
        scheduled_date: Utc.with_ymd_and_hms(2025, 9, 6, 17, 0, 0).unwrap(),
        scheduled_start_time: Utc.with_ymd_and_hms(2025, 9, 6, 17, 0, 0).unwrap(),
        actual_start_time: Some(Utc.with_ymd_and_hms(2025, 9, 6, 17, 2, 0).unwrap()),
        actual_end_time: Some(Utc.with_ymd_and_hms(2025, 9, 6, 18, 32, 0).unwrap()),
        status: SessionStatus::Completed,
        visitor_count,
        interest_level_distribution: InterestDistribution {
            high: visitor_count.min(1),
            medium: visitor_count.saturating_sub(1),
            low: 0,
        },
        notes: None,
    }
}

fn visitor(n: usize, name: &str) -> Visitor {
    let ts = Utc.with_ymd_and_hms(2025, 9, 6, 17, 15, 0).unwrap();
    Visitor {
        visitor_id: VisitorId(format!("v-{}", n)),
        session_id: SessionId("sess-100".to_string()),
        name: name.to_string(),
        email: format!("guest{}@example.com", n),
        phone: "555-0199".to_string(),
        interest_level: if n == 0 { InterestLevel::High } else { InterestLevel::Medium },
        check_in_time: ts,
        source: VisitorSource::Manual,
        follow_up_generated: n == 0,
        follow_up_sent: false,
        follow_up_sent_at: None,
        notes: if n == 0 { Some("Asked about the school district".to_string()) } else { None },
        created_at: ts,
        updated_at: ts,
    }
}

#[test]
fn test_csv_round_trips_through_parser() {
    let visitors = vec![visitor(0, "Jane \"JJ\" Doe"), visitor(1, "Roe, John")];
    let csv_text = generate_visitor_csv(&visitors, &CsvFieldConfig::default()).unwrap();

    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    assert_eq!(reader.headers().unwrap().len(), 13);

    let records: Vec<csv::StringRecord> =
        reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][1], "Jane \"JJ\" Doe");
    assert_eq!(&records[1][1], "Roe, John");
    assert_eq!(&records[0][4], "High");
    assert_eq!(&records[0][7], "Yes");
    assert_eq!(&records[1][7], "No");

    // Timestamps re-parse
    assert!(chrono::DateTime::parse_from_rfc3339(&records[0][5]).is_ok());
}

#[test]
fn test_csv_export_written_to_disk() {
    let dir = tempdir().unwrap();
    let writer = ExportWriter::new(dir.path().to_str().unwrap());

    let visitors = vec![visitor(0, "Jane Doe")];
    let csv_text = generate_visitor_csv(&visitors, &CsvFieldConfig::default()).unwrap();
    let s = session(1);

    let path = writer.write(&s.session_id, ExportFormat::Csv, csv_text.as_bytes()).unwrap();
    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert_eq!(on_disk, csv_text);
}

#[test]
fn test_pdf_export_written_to_disk() {
    let dir = tempdir().unwrap();
    let writer = ExportWriter::new(dir.path().to_str().unwrap());

    let s = session(2);
    let visitors = vec![visitor(0, "Jane Doe"), visitor(1, "John Roe")];
    let bytes = generate_session_pdf(&s, &visitors).unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    let path = writer.write(&s.session_id, ExportFormat::Pdf, &bytes).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), bytes);
}

#[test]
fn test_pdf_handles_empty_session() {
    let bytes = generate_session_pdf(&session(0), &[]).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert!(!bytes.is_empty());
}
