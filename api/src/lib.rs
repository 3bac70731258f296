use std::{env, error::Error, sync::Arc};

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{info, warn};

use crate::{
    core::app_state::AppState,
    error_handler::AppError,
    middleware_layer::json_extractor::json_error_mapper,
    routes::{
        downtime::{analyze_route::analyze_route, segments_route::segments_route},
        health::health_route::health_route,
    },
};

const DEFAULT_API_ADDRESS: &str = "127.0.0.1:8080";

/// All routes over the given state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_route))
        .route("/downtime/segments", post(segments_route))
        .route("/downtime/analyze", post(analyze_route))
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

pub async fn start() -> Result<(), Box<dyn Error>> {
    let host_url = env::var("API_ADDRESS")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_ADDRESS.to_string());

    let state = Arc::new(AppState::from_env()?);
    let app = router(state);

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "downtime API listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::{CompletionService, LlmModelConfig, LlmProvider, RetryPolicy};
    use axum::{
        Json,
        body::Body,
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use tower::ServiceExt;

    type Seen = Arc<Mutex<Vec<Value>>>;

    async fn call(method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        call_with(Arc::new(AppState::default()), method, uri, body).await
    }

    async fn call_with(
        state: Arc<AppState>,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let app = router(state);
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };

        let res = app.oneshot(req.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    /// Ollama-shaped server on an ephemeral port answering every
    /// `/api/generate` call with `status` and `reply`. Request bodies are
    /// recorded in the returned log.
    async fn stub_llm(status: StatusCode, reply: &'static str) -> (Arc<AppState>, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let stub = Router::new().route(
            "/api/generate",
            post(move |Json(req): Json<Value>| {
                let log = log.clone();
                async move {
                    log.lock().unwrap().push(req);
                    (status, Json(json!({ "response": reply })))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, stub).await.unwrap();
        });

        let cfg = LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "test-model".into(),
            endpoint: format!("http://{addr}"),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        };
        let svc = CompletionService::new(cfg, RetryPolicy::none()).unwrap();
        (Arc::new(AppState::new(Some(Arc::new(svc)))), seen)
    }

    const FENCED_ANALYSIS: &str = r#"Here is the analysis:
```json
{
  "summary": { "totalDowntimeHours": 10 },
  "rootCauseAnalysis": [{
    "cause": "Stoppage on line 2",
    "evidence": ["Emergency stop pressed 4 times"],
    "estimatedImpact": "4 hours",
    "category": "safety"
  }],
  "patterns": [{ "title": "Bearing wear on conveyor" }]
}
```"#;

    const NATIVE_SEGMENTS: &str = r#"{"segments":{"safety":{"downtimeHours":12,"severity":"critical","keyMetrics":{"incidentCount":2,"riskScore":"High"},"kpis":[{"name":"TRIR","current":1.2}]},"quality":"n/a"}}"#;

    #[tokio::test]
    async fn health_reports_llm_state() {
        let (status, v) = call("GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["success"], true);
        assert_eq!(v["data"]["status"], "ok");
        assert_eq!(v["data"]["llmConfigured"], false);
    }

    #[tokio::test]
    async fn segments_route_builds_four_segments() {
        let analysis = json!({
            "summary": { "totalDowntimeHours": 100 },
            "rootCauseAnalysis": [{
                "cause": "Bearing wear on conveyor",
                "estimatedImpact": "40 hours",
                "category": "maintenance"
            }],
            "patterns": [{
                "title": "Changeover delays",
                "description": "Long setup between runs",
                "category": "operations"
            }]
        });

        let (status, v) = call("POST", "/downtime/segments", Some(json!({ "analysis": analysis }))).await;
        assert_eq!(status, StatusCode::OK);

        let segments = &v["data"]["segments"];
        for key in ["safety", "quality", "operations", "maintenance"] {
            assert!(segments.get(key).is_some(), "missing {key}");
        }
        assert_eq!(segments["maintenance"]["downtimeHours"], 70.0);
        assert_eq!(segments["maintenance"]["severity"], "high");
        assert_eq!(segments["operations"]["downtimeHours"], 30.0);
        assert_eq!(v["data"]["totals"]["downtimeHours"], 100.0);
        assert_eq!(v["data"]["totals"]["dominantSegment"], "maintenance");
    }

    #[tokio::test]
    async fn segments_route_returns_native_segments_verbatim() {
        let analysis: Value = serde_json::from_str(NATIVE_SEGMENTS).unwrap();
        let (status, v) = call("POST", "/downtime/segments", Some(json!({ "analysis": analysis }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["data"]["segments"], analysis["segments"]);
        assert_eq!(v["data"]["totals"]["downtimeHours"], 12.0);
        assert_eq!(v["data"]["totals"]["dominantSegment"], "safety");
    }

    #[tokio::test]
    async fn null_analysis_yields_null_segments() {
        let (status, v) = call("POST", "/downtime/segments", Some(json!({ "analysis": null }))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(v["data"]["segments"].is_null());
        assert!(v["data"]["totals"].is_null());
    }

    #[tokio::test]
    async fn non_object_analysis_is_rejected_in_envelope() {
        let (status, v) = call(
            "POST",
            "/downtime/segments",
            Some(json!({ "analysis": "not an object" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(v["success"], false);
        assert_eq!(v["error"]["code"], "UNPROCESSABLE_ENTITY");
        assert_eq!(v["error"]["details"][0]["path"], "analysis");
    }

    #[tokio::test]
    async fn analyze_without_llm_is_unavailable() {
        let (status, v) = call(
            "POST",
            "/downtime/analyze",
            Some(json!({ "prompt": "Line 3 stopped twice for jams" })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(v["error"]["code"], "LLM_NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn analyze_segments_fenced_llm_reply() {
        let (state, seen) = stub_llm(StatusCode::OK, FENCED_ANALYSIS).await;
        let (status, v) = call_with(
            state,
            "POST",
            "/downtime/analyze",
            Some(json!({ "prompt": "Line 2: e-stop pressed 4 times, 4 hours lost" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let data = &v["data"];
        assert_eq!(
            data["analysis"]["rootCauseAnalysis"][0]["evidence"],
            "Emergency stop pressed 4 times"
        );

        let segments = &data["segments"];
        assert_eq!(segments["safety"]["rootCauses"][0]["cause"], "Stoppage on line 2");
        assert_eq!(
            segments["safety"]["rootCauses"][0]["evidence"],
            "Emergency stop pressed 4 times"
        );
        assert_eq!(segments["safety"]["downtimeHours"], 7.0);
        assert_eq!(segments["maintenance"]["downtimeHours"], 3.0);
        assert_eq!(data["totals"]["downtimeHours"], 10.0);
        assert_eq!(data["totals"]["dominantSegment"], "safety");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["format"], "json");
        assert_eq!(seen[0]["prompt"], "Line 2: e-stop pressed 4 times, 4 hours lost");
        assert!(seen[0].get("system").is_none());
    }

    #[tokio::test]
    async fn analyze_passes_native_segments_and_caller_system() {
        let (state, seen) = stub_llm(StatusCode::OK, NATIVE_SEGMENTS).await;
        let (status, v) = call_with(
            state,
            "POST",
            "/downtime/analyze",
            Some(json!({ "prompt": "records", "system": "Answer with segments JSON." })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let expected: Value = serde_json::from_str(NATIVE_SEGMENTS).unwrap();
        assert_eq!(v["data"]["segments"], expected["segments"]);
        assert_eq!(v["data"]["segments"]["safety"]["severity"], "critical");
        assert_eq!(seen.lock().unwrap()[0]["system"], "Answer with segments JSON.");
    }

    #[tokio::test]
    async fn analyze_rejects_blank_prompt_before_calling_llm() {
        let (state, seen) = stub_llm(StatusCode::OK, FENCED_ANALYSIS).await;
        let (status, v) = call_with(
            state,
            "POST",
            "/downtime/analyze",
            Some(json!({ "prompt": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(v["error"]["code"], "BAD_REQUEST");
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn analyze_reply_without_object_is_unprocessable() {
        let (state, _) = stub_llm(StatusCode::OK, "No downtime records were provided.").await;
        let (status, v) = call_with(
            state,
            "POST",
            "/downtime/analyze",
            Some(json!({ "prompt": "records" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(v["error"]["code"], "ANALYSIS_PARSE_FAILED");
    }

    #[tokio::test]
    async fn analyze_maps_upstream_failures() {
        let (state, _) = stub_llm(StatusCode::TOO_MANY_REQUESTS, "slow down").await;
        let (status, v) = call_with(
            state,
            "POST",
            "/downtime/analyze",
            Some(json!({ "prompt": "records" })),
        )
        .await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(v["error"]["code"], "LLM_RATE_LIMITED");

        let (state, _) = stub_llm(StatusCode::INTERNAL_SERVER_ERROR, "boom").await;
        let (status, v) = call_with(
            state,
            "POST",
            "/downtime/analyze",
            Some(json!({ "prompt": "records" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(v["error"]["code"], "LLM_UPSTREAM_ERROR");
    }
}
