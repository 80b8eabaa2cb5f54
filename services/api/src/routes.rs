use crate::infra::{AnalyticsState, AppState};
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use cohort_insight::analytics::{AnalyticsResult, QueryMode};
use cohort_insight::dataset::{DatasetLoader, DatasetSnapshot};
use cohort_insight::error::AppError;
use cohort_insight::residency::ResidencySummary;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AnalyticsParams {
    #[serde(default)]
    pub(crate) mode: Option<String>,
    #[serde(default)]
    pub(crate) target: Option<String>,
    #[serde(default)]
    pub(crate) target_rank: Option<String>,
    #[serde(default)]
    pub(crate) target_percentage: Option<String>,
}

impl AnalyticsParams {
    fn parameter(&self, mode: Option<QueryMode>) -> Option<&str> {
        let specific = match mode {
            Some(QueryMode::Distance) => self.target_rank.as_deref(),
            Some(QueryMode::Need) => self.target_percentage.as_deref(),
            Some(QueryMode::Search) | None => None,
        };
        specific.or(self.target.as_deref())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyticsResponse {
    pub(crate) student_id: String,
    pub(crate) mode: String,
    pub(crate) result: Option<AnalyticsResult>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResidencyParams {
    #[serde(default)]
    pub(crate) year: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReloadRequest {
    #[serde(default)]
    pub(crate) scores_csv: Option<String>,
    #[serde(default)]
    pub(crate) ranks_csv: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ReloadSource {
    Configured,
    Inline,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReloadResponse {
    pub(crate) source: ReloadSource,
    pub(crate) scores: usize,
    pub(crate) ranks: usize,
    pub(crate) loaded_at: DateTime<Utc>,
}

pub(crate) fn analytics_router(state: AnalyticsState) -> Router {
    Router::new()
        .route(
            "/api/v1/students/:student_id/analytics",
            get(analytics_endpoint),
        )
        .route("/api/v1/residency", get(residency_endpoint))
        .route("/api/v1/datasets/reload", post(reload_endpoint))
        .with_state(state)
}

pub(crate) fn with_service_routes(state: AnalyticsState) -> Router {
    analytics_router(state)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Acquire);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        let snapshot = state.store.current();
        json!({
            "status": "ready",
            "snapshot": {
                "scores": snapshot.scores.count(),
                "ranks": snapshot.ranks.count(),
                "loaded_at": snapshot.loaded_at,
            }
        })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn analytics_endpoint(
    State(state): State<AnalyticsState>,
    Path(student_id): Path<String>,
    Query(params): Query<AnalyticsParams>,
) -> Json<AnalyticsResponse> {
    let mode = params
        .mode
        .clone()
        .unwrap_or_else(|| QueryMode::Search.label().to_string());
    let parameter = params.parameter(QueryMode::parse(&mode));

    let result = state.facade().query(&student_id, &mode, parameter);

    Json(AnalyticsResponse {
        student_id,
        mode,
        result,
    })
}

pub(crate) async fn residency_endpoint(
    State(state): State<AnalyticsState>,
    Query(params): Query<ResidencyParams>,
) -> Json<ResidencySummary> {
    let snapshot = state.store.current();
    Json(snapshot.residency.summary(params.year.as_deref()))
}

/// An empty body reloads the configured exports; anything else must be a
/// valid [`ReloadRequest`] or the current snapshot stays installed.
pub(crate) async fn reload_endpoint(
    State(state): State<AnalyticsState>,
    body: Bytes,
) -> Result<Json<ReloadResponse>, AppError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        ReloadRequest::default()
    } else {
        serde_json::from_slice::<ReloadRequest>(&body)?
    };

    let (snapshot, source) = if request.scores_csv.is_none() && request.ranks_csv.is_none() {
        (DatasetSnapshot::load(&state.data), ReloadSource::Configured)
    } else {
        let current = state.store.current();
        let id_column = state.data.id_column.as_str();
        let scores = match request.scores_csv {
            Some(csv) => DatasetLoader::from_reader(Cursor::new(csv.into_bytes()), id_column)?,
            None => current.scores.clone(),
        };
        let ranks = match request.ranks_csv {
            Some(csv) => DatasetLoader::from_reader(Cursor::new(csv.into_bytes()), id_column)?,
            None => current.ranks.clone(),
        };
        (
            DatasetSnapshot::new(scores, ranks, current.residency.clone()),
            ReloadSource::Inline,
        )
    };

    let response = ReloadResponse {
        source,
        scores: snapshot.scores.count(),
        ranks: snapshot.ranks.count(),
        loaded_at: snapshot.loaded_at,
    };
    state.store.replace(snapshot);
    info!(?source, scores = response.scores, ranks = response.ranks, "analytics snapshot replaced");

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use cohort_insight::config::{DataConfig, GradingCeilings};
    use cohort_insight::dataset::SnapshotStore;
    use cohort_insight::residency::ResidencyArchive;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    const SCORES: &str = "ID,NAME,ANATOMY,%,TOTAL\n\
S1,Hana,300,0.9,3000\n\
S2,Karim,280,0.8,2800\n\
S3,Laila,250,0.7,2500\n\
S4,Omar,250,0.7,2500\n";

    const RANKS: &str = "ID,FIRST YEAR RANK,SECOND YEAR RANK C,THIRD YEAR RANK C,FOURTH YEAR RANK C\n\
S1,12,8,5,\n";

    fn state() -> AnalyticsState {
        let scores = DatasetLoader::from_reader(Cursor::new(SCORES), "ID").expect("scores load");
        let ranks = DatasetLoader::from_reader(Cursor::new(RANKS), "ID").expect("ranks load");
        AnalyticsState {
            store: Arc::new(SnapshotStore::new(DatasetSnapshot::new(
                scores,
                ranks,
                ResidencyArchive::default(),
            ))),
            ceilings: GradingCeilings::new(3180.0, 4875.0, 1695.0).expect("consistent"),
            data: DataConfig {
                scores_path: "./missing/scores.csv".into(),
                ranks_path: "./missing/ranks.csv".into(),
                residency_dir: "./missing/residency".into(),
                id_column: "ID".to_string(),
            },
        }
    }

    async fn read_json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json body")
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");
        let status = response.status();
        (status, read_json_body(response).await)
    }

    #[tokio::test]
    async fn search_defaults_and_includes_trajectory() {
        let (status, body) = get_json(analytics_router(state()), "/api/v1/students/S1/analytics").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "search");
        assert_eq!(body["result"]["kind"], "score");
        assert_eq!(body["result"]["percentile"], 75);
        assert_eq!(body["result"]["name"], "Hana");
        let points = body["result"]["trajectory"]["points"]
            .as_array()
            .expect("trajectory points");
        assert_eq!(points.len(), 3);
        assert_eq!(points[1]["change"]["direction"], "improved");
    }

    #[tokio::test]
    async fn distance_reports_signed_points() {
        let (_, body) = get_json(
            analytics_router(state()),
            "/api/v1/students/S3/analytics?mode=distance&target_rank=1",
        )
        .await;

        assert_eq!(body["result"]["kind"], "distance");
        assert_eq!(body["result"]["current_rank"], 3);
        assert_eq!(body["result"]["status"], "reachable");
        assert_eq!(body["result"]["points_difference"], 500.0);
    }

    #[tokio::test]
    async fn distance_beyond_cohort_is_unreachable() {
        let (_, body) = get_json(
            analytics_router(state()),
            "/api/v1/students/S3/analytics?mode=distance&target=9",
        )
        .await;

        assert_eq!(body["result"]["status"], "unreachable");
        assert_eq!(body["result"]["cohort_size"], 4);
        assert!(body["result"].get("points_difference").is_none());
    }

    #[tokio::test]
    async fn malformed_parameters_yield_null_result() {
        for uri in [
            "/api/v1/students/S1/analytics?mode=distance&target_rank=abc",
            "/api/v1/students/S1/analytics?mode=need&target_percentage=140",
            "/api/v1/students/S1/analytics?mode=need",
            "/api/v1/students/S1/analytics?mode=unknown",
            "/api/v1/students/NOPE/analytics",
        ] {
            let (status, body) = get_json(analytics_router(state()), uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert!(body["result"].is_null(), "{uri}");
        }
    }

    #[tokio::test]
    async fn need_reports_projection() {
        let (_, body) = get_json(
            analytics_router(state()),
            "/api/v1/students/S1/analytics?mode=need&target_percentage=100",
        )
        .await;

        assert_eq!(body["result"]["kind"], "need");
        assert_eq!(body["result"]["outlook"], "unreachable");
        let required = body["result"]["required_remaining_percentage"]
            .as_f64()
            .expect("number");
        assert!(required > 100.0);
    }

    #[tokio::test]
    async fn inline_reload_swaps_snapshot() {
        let state = state();
        let store = state.store.clone();
        let router = analytics_router(state);

        let payload = json!({ "scores_csv": "ID,NAME,TOTAL\nZ1,Nour,100\n" });
        let response = router
            .oneshot(
                Request::post("/api/v1/datasets/reload")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["source"], "inline");
        assert_eq!(body["scores"], 1);
        assert_eq!(body["ranks"], 1);
        assert!(store.current().scores.lookup("Z1").is_some());
        assert!(store.current().scores.lookup("S1").is_none());
    }

    #[tokio::test]
    async fn inline_reload_rejects_csv_without_identifier() {
        let state = state();
        let store = state.store.clone();

        let payload = json!({ "scores_csv": "NAME,TOTAL\nNour,100\n" });
        let result = reload_endpoint(State(state), Bytes::from(payload.to_string())).await;

        let error = result.expect_err("identifier column missing");
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
        assert!(store.current().scores.lookup("S1").is_some());
    }

    #[tokio::test]
    async fn malformed_reload_body_is_rejected_and_keeps_snapshot() {
        for (content_type, payload) in [
            ("application/json", r#"{"scores_csv": 42}"#),
            ("application/json", "not json"),
            ("text/plain", r#"{"scores_csv": ["ID"]}"#),
        ] {
            let state = state();
            let store = state.store.clone();
            let response = analytics_router(state)
                .oneshot(
                    Request::post("/api/v1/datasets/reload")
                        .header(header::CONTENT_TYPE, content_type)
                        .body(Body::from(payload))
                        .expect("request builds"),
                )
                .await
                .expect("route executes");

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{payload}");
            let body = read_json_body(response).await;
            assert!(body["error"]
                .as_str()
                .expect("error message")
                .contains("invalid request body"));
            assert!(store.current().scores.lookup("S1").is_some(), "{payload}");
        }
    }

    #[tokio::test]
    async fn configured_reload_degrades_to_empty_snapshot() {
        let state = state();
        let store = state.store.clone();

        let Json(body) = reload_endpoint(State(state), Bytes::new())
            .await
            .expect("reload succeeds");

        assert_eq!(body.source, ReloadSource::Configured);
        assert_eq!(body.scores, 0);
        assert!(store.current().scores.lookup("S1").is_none());
    }

    #[tokio::test]
    async fn residency_defaults_to_empty_summary() {
        let (status, body) = get_json(analytics_router(state()), "/api/v1/residency?year=2025").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
        assert_eq!(body["year"], "2024");
    }
}
