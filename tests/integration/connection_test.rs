//! Connection and value-conversion integration tests.
//!
//! These need a running PostgreSQL database; they skip when DATABASE_URL
//! is not set.

use clinreport::config::ConnectionConfig;
use clinreport::db::{DatabaseClient, PostgresClient, Value};
use clinreport::error::ReportError;

/// Helper to get the test database URL from the environment.
fn get_test_database_url() -> Option<String> {
    std::env::var("DATABASE_URL").ok()
}

/// Helper to create a test client.
async fn get_test_client() -> Option<PostgresClient> {
    let url = get_test_database_url()?;
    let config = ConnectionConfig::from_connection_string(&url).ok()?;
    PostgresClient::connect(&config).await.ok()
}

#[tokio::test]
async fn test_connect_and_close() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_execute_simple_select() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let result = client
        .execute_query("SELECT 1 as num, 'hello' as greeting", &[])
        .await
        .unwrap();

    assert_eq!(result.columns.len(), 2);
    assert_eq!(result.columns[0].name, "num");
    assert_eq!(result.columns[1].name, "greeting");
    assert_eq!(result.row_count, 1);
    assert_eq!(result.rows[0][1], Value::from("hello"));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_execute_select_with_bound_parameter() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let result = client
        .execute_query("SELECT $1 AS echoed", &["patient-42"])
        .await
        .unwrap();

    assert_eq!(result.rows[0][0], Value::from("patient-42"));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_empty_result_still_has_columns() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let result = client
        .execute_query("SELECT 1 AS id, 'x' AS name WHERE false", &[])
        .await
        .unwrap();

    assert_eq!(result.row_count, 0);
    assert_eq!(result.columns.len(), 2);
    assert_eq!(result.columns[0].name, "id");
    assert_eq!(result.columns[1].name, "name");

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_value_conversions_for_report_types() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let result = client
        .execute_query(
            "SELECT \
                '9d18a0c6-8682-43fe-b465-938ce66133d1'::uuid AS id, \
                DATE '2024-03-05' AS encounter_date, \
                ROUND(5.0 / 3, 2) AS avg_encounters, \
                true AS active, \
                NULL::text AS reason",
            &[],
        )
        .await
        .unwrap();

    let row = &result.rows[0];
    assert_eq!(
        row[0],
        Value::from("9d18a0c6-8682-43fe-b465-938ce66133d1")
    );
    assert_eq!(row[1], Value::from("2024-03-05"));
    assert_eq!(row[2], Value::from("1.67"));
    assert_eq!(row[3], Value::Bool(true));
    assert_eq!(row[4], Value::Null);

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_query_against_missing_table_fails() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let result = client
        .execute_query("SELECT * FROM nonexistent_table_xyz", &[])
        .await;
    assert!(result.is_err());

    let error = result.unwrap_err();
    assert!(matches!(error, ReportError::Query(_)));
    assert!(
        error.to_string().contains("nonexistent_table_xyz")
            || error.to_string().contains("does not exist")
    );

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_connect_bad_host_is_connection_error() {
    let config = ConnectionConfig {
        host: Some("nonexistent.invalid.host".to_string()),
        port: 5432,
        database: Some("clinic".to_string()),
        user: Some("reporter".to_string()),
        password: Some("secret".to_string()),
    };

    let result = PostgresClient::connect(&config).await;
    assert!(result.is_err());
    assert!(matches!(result.unwrap_err(), ReportError::Connection(_)));
}
