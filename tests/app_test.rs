#![cfg(feature = "web")]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use eor_dashboard::app::router;
use eor_dashboard::render::{Dashboard, InfoPanel};
use eor_dashboard::{CellValue, CriteriaRow, DashboardData, FAILING_LABEL, ScoreRow, XLSX_MIME};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tower::ServiceExt;

fn sample_data() -> DashboardData {
    DashboardData {
        scores: vec![
            ScoreRow {
                method: "Polymer".to_string(),
                validation: Some(0.0),
                final_score: Some(7.4),
            },
            ScoreRow {
                method: "CO2 <miscible>".to_string(),
                validation: Some(1.0),
                final_score: Some(8.0),
            },
        ],
        criteria: vec![CriteriaRow {
            method: CellValue::text("Polymer"),
            criterion: CellValue::text("Viscosity"),
            value: CellValue::Number(5.0),
            status: FAILING_LABEL,
        }],
    }
}

fn app(data: DashboardData, download_path: &Path) -> Router {
    let info = InfoPanel {
        author: Some("Screening Team".to_string()),
        contacts: vec!["team@example.com".to_string()],
    };
    router(Dashboard::new(
        data,
        PathBuf::from("screening.xlsm"),
        download_path.to_path_buf(),
        info,
    ))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, body.to_vec())
}

#[tokio::test]
async fn page_has_all_five_views() {
    let dir = TempDir::new().unwrap();
    let (status, _, body) = get(app(sample_data(), &dir.path().join("DATOS EOR.xlsx")), "/").await;
    assert_eq!(status, StatusCode::OK);

    let html = String::from_utf8(body).unwrap();
    for label in ["Scores", "Unmet Criteria", "Bar Chart", "Radar Chart", "Author Information"] {
        assert!(html.contains(label), "missing tab {}", label);
    }
    assert!(html.contains(r#"<td style="background-color: red">Polymer</td>"#));
    assert!(html.contains("<td>CO2 &lt;miscible&gt;</td>"));
    assert!(html.contains("<td>8.0</td>"));
    assert!(html.contains("DOES NOT MEET"));
    assert_eq!(html.matches("<svg").count(), 2);
    println!("✓ Dashboard renders tables, charts and info panel");
}

#[tokio::test]
async fn missing_download_shows_notice_only() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("DATOS EOR.xlsx");

    let (_, _, body) = get(app(sample_data(), &missing), "/").await;
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("was not found"));
    assert!(!html.contains(r#"href="/download""#));
    assert!(html.contains("7.4"));

    let (status, _, _) = get(app(sample_data(), &missing), "/download").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    println!("✓ Missing download file handled without affecting other views");
}

#[tokio::test]
async fn download_serves_raw_bytes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("DATOS EOR.xlsx");
    let bytes = b"PK\x03\x04 not really a workbook".to_vec();
    std::fs::write(&path, &bytes).unwrap();

    let (_, _, body) = get(app(sample_data(), &path), "/").await;
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains(r#"href="/download""#));
    assert!(!html.contains("was not found"));

    let (status, content_type, body) = get(app(sample_data(), &path), "/download").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some(XLSX_MIME));
    assert_eq!(body, bytes);
}

#[tokio::test]
async fn json_endpoints_return_tables() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("none.xlsx");

    let (_, _, body) = get(app(sample_data(), &missing), "/api/scores").await;
    let scores: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(scores[0]["method"], "Polymer");
    assert_eq!(scores[0]["final_score"], 7.4);

    let (_, _, body) = get(app(sample_data(), &missing), "/api/criteria").await;
    let criteria: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(criteria[0]["status"], "DOES NOT MEET");
    assert_eq!(criteria[0]["value"], 5.0);
}

#[tokio::test]
async fn charts_and_exports() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("none.xlsx");

    let (status, content_type, body) = get(app(sample_data(), &missing), "/charts/radar.svg").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/svg+xml"));
    assert!(String::from_utf8(body).unwrap().starts_with("<svg"));

    let (_, _, body) = get(app(sample_data(), &missing), "/export/scores.csv").await;
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "EOR Method,Validation,Final Score\nPolymer,0,7.4\nCO2 <miscible>,1,8.0\n"
    );

    let (status, content_type, body) = get(app(sample_data(), &missing), "/export/tables.xlsx").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some(XLSX_MIME));
    assert!(body.starts_with(b"PK"));
}

#[tokio::test]
async fn empty_scores_render_without_charts() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("none.xlsx");
    let data = DashboardData::default();

    let (_, _, body) = get(app(data.clone(), &missing), "/").await;
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("No final scores to plot."));
    assert!(!html.contains("<svg"));

    let (status, _, _) = get(app(data, &missing), "/charts/bar.svg").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
