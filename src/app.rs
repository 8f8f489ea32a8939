#![cfg(feature = "web")]
use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::downloader::{self, DownloadFile, XLSX_MIME};
use crate::error::DashboardError;
use crate::graph::{self, GraphOptions};
use crate::render::Dashboard;

/// Path the download button points at
pub const DOWNLOAD_ROUTE: &str = "/download";

/// Shared, read-only state: the tables never change after loading
pub struct AppState {
    dashboard: Dashboard,
}

/// Build the router over an already loaded dashboard
pub fn router(dashboard: Dashboard) -> Router {
    let app_state = Arc::new(AppState { dashboard });

    Router::new()
        .route("/", get(serve_dashboard))
        .route("/api/scores", get(get_scores))
        .route("/api/criteria", get(get_criteria))
        .route("/charts/bar.svg", get(bar_chart))
        .route("/charts/radar.svg", get(radar_chart))
        .route(DOWNLOAD_ROUTE, get(download_file))
        .route("/export/scores.csv", get(export_scores_csv))
        .route("/export/criteria.csv", get(export_criteria_csv))
        .route("/export/tables.xlsx", get(export_tables_xlsx))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Serve the dashboard until the process is stopped
pub async fn run(dashboard: Dashboard, address: &str) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(dashboard);

    let listener = TcpListener::bind(address).await?;
    log::info!("listening on http://{}", address);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_dashboard(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.dashboard.render(DOWNLOAD_ROUTE))
}

async fn get_scores(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.dashboard.data.scores.clone())
}

async fn get_criteria(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.dashboard.data.criteria.clone())
}

async fn bar_chart(State(state): State<Arc<AppState>>) -> Response {
    chart_response(&state, &GraphOptions::bar())
}

async fn radar_chart(State(state): State<Arc<AppState>>) -> Response {
    chart_response(&state, &GraphOptions::radar())
}

fn chart_response(state: &AppState, options: &GraphOptions) -> Response {
    let scores = &state.dashboard.data.scores;
    if !graph::has_plottable_scores(scores) {
        return (StatusCode::NOT_FOUND, "no final scores to plot").into_response();
    }

    match graph::create_graph(scores, options) {
        Ok(svg) => ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response(),
        Err(e) => error_response(e),
    }
}

async fn download_file(State(state): State<Arc<AppState>>) -> Response {
    let download = state.dashboard.download();
    let file_name = match &download {
        DownloadFile::Available { file_name, .. } => file_name.clone(),
        DownloadFile::Missing { path } => {
            log::warn!("download requested but {} is missing", path.display());
            return (StatusCode::NOT_FOUND, "download file not found").into_response();
        }
    };

    match download.read() {
        Ok(bytes) => {
            log::info!("serving {} ({} bytes)", file_name, bytes.len());
            (
                [
                    (header::CONTENT_TYPE, XLSX_MIME.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", file_name),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn export_scores_csv(State(state): State<Arc<AppState>>) -> Response {
    csv_response(
        "scores.csv",
        downloader::scores_to_csv(&state.dashboard.data.scores),
    )
}

async fn export_criteria_csv(State(state): State<Arc<AppState>>) -> Response {
    csv_response(
        "criteria.csv",
        downloader::criteria_to_csv(&state.dashboard.data.criteria),
    )
}

async fn export_tables_xlsx(State(state): State<Arc<AppState>>) -> Response {
    let data = &state.dashboard.data;
    match downloader::tables_to_xlsx(&data.scores, &data.criteria) {
        Ok(buffer) => (
            [
                (header::CONTENT_TYPE, XLSX_MIME),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"eor_tables.xlsx\""),
            ],
            buffer,
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

fn csv_response(file_name: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response()
}

fn error_response(e: DashboardError) -> Response {
    log::error!("{}", e);
    let status = match e {
        DashboardError::MissingOptionalFile { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string()).into_response()
}
