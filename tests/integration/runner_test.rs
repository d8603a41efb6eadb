//! End-to-end runner tests against mock database clients.
//!
//! These run without a database and verify the reporting pass contract:
//! section order, formatting, and abort-on-first-error behavior.

use clinreport::catalog::REPORTS;
use clinreport::db::{ColumnInfo, FailingDatabaseClient, MockDatabaseClient, QueryResult, Value};
use clinreport::error::ReportError;
use clinreport::report::{ReportOptions, ReportRunner};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_full_pass_emits_ten_titled_sections() {
    let client = MockDatabaseClient::new();
    let mut out = Vec::new();

    ReportRunner::new(&client, &mut out, ReportOptions::default())
        .run_all()
        .await
        .unwrap();

    let output = String::from_utf8(out).unwrap();
    let dashes = "-".repeat(20);

    let mut cursor = 0;
    for report in REPORTS {
        let header = format!("{dashes} {} {dashes}", report.title);
        let pos = output[cursor..]
            .find(&header)
            .unwrap_or_else(|| panic!("header for {} missing or out of order", report.name));
        cursor += pos + header.len();
    }

    assert_eq!(client.executed_queries().len(), REPORTS.len());
}

#[tokio::test]
async fn test_queries_execute_in_catalog_order() {
    let client = MockDatabaseClient::new();
    let mut out = Vec::new();

    ReportRunner::new(&client, &mut out, ReportOptions::default())
        .run_all()
        .await
        .unwrap();

    let executed = client.executed_queries();
    let expected: Vec<String> = REPORTS.iter().map(|r| r.sql.to_string()).collect();
    assert_eq!(executed, expected);
}

#[tokio::test]
async fn test_failure_on_fifth_report_stops_the_batch() {
    let client = FailingDatabaseClient::failing_on(5);
    let mut out = Vec::new();

    let err = ReportRunner::new(&client, &mut out, ReportOptions::default())
        .run_all()
        .await
        .unwrap_err();

    assert!(matches!(err, ReportError::Query(_)));
    assert!(err.to_string().contains("simulated failure"));

    // Exactly five queries attempted: four successes plus the failure.
    assert_eq!(client.attempted_queries(), 5);

    // The four completed sections survive in the output.
    let output = String::from_utf8(out).unwrap();
    for report in &REPORTS[..4] {
        assert!(output.contains(report.title));
    }
    for report in &REPORTS[5..] {
        assert!(!output.contains(report.title));
    }
}

#[tokio::test]
async fn test_rendered_table_shows_scripted_clinical_rows() {
    let scripted = QueryResult::with_data(
        vec![
            ColumnInfo::new("cohort_month", "text"),
            ColumnInfo::new("total_patients", "int8"),
            ColumnInfo::new("retained_patients", "int8"),
            ColumnInfo::new("retention_rate", "numeric"),
        ],
        vec![
            vec![
                Value::from("2024-01"),
                Value::Int(2),
                Value::Int(2),
                Value::from("100.00"),
            ],
            vec![
                Value::from("2024-03"),
                Value::Int(1),
                Value::Int(0),
                Value::from("0.00"),
            ],
        ],
    );
    let client = MockDatabaseClient::with_results(vec![scripted]);
    let mut out = Vec::new();

    ReportRunner::new(&client, &mut out, ReportOptions::default())
        .run_one("retention_by_cohort")
        .await
        .unwrap();

    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("Patient Retention by Cohort"));
    assert!(output.contains("cohort_month"));
    assert!(output.contains("2024-01"));
    assert!(output.contains("100.00"));
    let first = output.find("2024-01").unwrap();
    let second = output.find("2024-03").unwrap();
    assert!(first < second, "row order must match the result set");
}

#[tokio::test]
async fn test_patient_flag_reaches_both_patient_reports() {
    let client = MockDatabaseClient::new();
    let mut out = Vec::new();
    let options = ReportOptions {
        patient: Some("3ed52e91-9a01-4a38-b8b6-55f0fe3662e6".to_string()),
    };

    ReportRunner::new(&client, &mut out, options)
        .run_all()
        .await
        .unwrap();

    let params = client.executed_params();
    let patient_param = vec!["3ed52e91-9a01-4a38-b8b6-55f0fe3662e6".to_string()];
    for (report, bound) in REPORTS.iter().zip(&params) {
        if report.takes_patient() {
            assert_eq!(bound, &patient_param, "report {}", report.name);
        } else {
            assert!(bound.is_empty(), "report {}", report.name);
        }
    }
}
