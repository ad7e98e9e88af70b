//! End-to-end tests for the sanitization pipeline: the full
//! normalize/filter/encode chain, the structural walker, the specialized
//! sanitizers, and the request middleware working together.

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::StatusCode,
    response::Response,
    routing::post,
    Router,
};
use bayan_core::prelude::*;
use serde_json::{json, Value};
use tower::{Layer, ServiceExt};

/// A spread of benign, hostile, and awkward inputs used by the property
/// checks below.
fn corpus() -> Vec<String> {
    let mut inputs: Vec<String> = vec![
        "".into(),
        "Juan Dela Cruz".into(),
        "  leading and trailing  ".into(),
        "tabs\tand\nnewlines".into(),
        "núñez straße 北京".into(),
        "<script>alert(1)</script>".into(),
        "<img src=x onerror=alert(1)>".into(),
        "1 OR 1=1".into(),
        "'; DROP TABLE residents; --".into(),
        "SELECT name FROM users WHERE id = 1".into(),
        "please select an option".into(),
        "a & b < c > d \" e ' f".into(),
        "javascript:alert(document.cookie)".into(),
        "credit UNION membership form".into(),
        FILTERED.to_string(),
    ];
    // Every single-byte ASCII char embedded in a word.
    for b in 0u8..=0x7F {
        inputs.push(format!("ab{}cd", b as char));
    }
    inputs
}

// ═══════════════════════════════════════════════════════════════════════════════
// Pipeline Properties
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn filters_are_idempotent_on_their_own_output() {
    for input in corpus() {
        let once = filter_sql(&input);
        assert_eq!(filter_sql(&once), once, "filter_sql not stable on {input:?}");
        let once = filter_xss(&input);
        assert_eq!(filter_xss(&once), once, "filter_xss not stable on {input:?}");
    }
}

#[test]
fn normalize_strips_every_control_byte() {
    for input in corpus() {
        let out = normalize(&input);
        for c in out.chars() {
            let code = c as u32;
            assert!(
                !matches!(code, 0x00..=0x08 | 0x0B | 0x0C | 0x0E..=0x1F | 0x7F),
                "control char {code:#x} survived in {out:?}"
            );
        }
    }
}

#[test]
fn sanitized_values_are_html_safe() {
    for input in corpus() {
        let out = sanitize_value(&input);
        assert!(!out.contains('<'), "raw < in {out:?}");
        assert!(!out.contains('>'), "raw > in {out:?}");
        assert!(!out.contains('"'), "raw quote in {out:?}");
        assert!(!out.contains('\''), "raw apostrophe in {out:?}");
        for (i, _) in out.match_indices('&') {
            let rest = &out[i..];
            assert!(
                rest.starts_with("&amp;")
                    || rest.starts_with("&lt;")
                    || rest.starts_with("&gt;")
                    || rest.starts_with("&quot;")
                    || rest.starts_with("&#39;"),
                "bare ampersand in {out:?}"
            );
        }
    }
}

#[test]
fn walker_preserves_structure_shape() {
    let input = json!({
        "resident": {
            "name": "  Juan<script>alert(1)</script>  ",
            "age": 67,
            "contacts": [
                {"kind": "phone", "value": "+63 912 345 6789"},
                {"kind": "email", "value": "juan@example.com"}
            ]
        },
        "notes": [null, true, "1 OR 1=1"]
    });
    let output = sanitize_structure(&input);

    fn same_shape(a: &Value, b: &Value) {
        match (a, b) {
            (Value::Object(x), Value::Object(y)) => {
                assert_eq!(x.len(), y.len());
                for ((ka, va), (kb, vb)) in x.iter().zip(y.iter()) {
                    assert_eq!(sanitize_value(ka), *kb, "key order or name drifted");
                    same_shape(va, vb);
                }
            }
            (Value::Array(x), Value::Array(y)) => {
                assert_eq!(x.len(), y.len());
                for (va, vb) in x.iter().zip(y.iter()) {
                    same_shape(va, vb);
                }
            }
            (_, Value::String(_)) => {}
            (_, other) => panic!("leaf became non-string: {other:?}"),
        }
    }
    same_shape(&input, &output);

    // Spot-check the leaf coercions.
    assert_eq!(output["resident"]["age"], json!("67"));
    assert_eq!(output["notes"][0], json!(""));
    assert_eq!(output["notes"][1], json!("true"));
    assert_eq!(output["notes"][2], json!(FILTERED));
}

#[test]
fn filenames_are_bounded_and_safe() {
    let mut inputs = corpus();
    inputs.push("x".repeat(10_000));
    inputs.push(format!("{}.pdf", "é".repeat(400)));
    for input in inputs {
        let out = sanitize_filename(&input);
        assert!(out.len() <= 255, "filename too long for {input:?}");
        assert!(!out.is_empty(), "empty filename for {input:?}");
        for forbidden in ['<', '>', ':', '"', '/', '\\', '|', '?', '*'] {
            assert!(!out.contains(forbidden), "{forbidden:?} in {out:?}");
        }
    }
    assert_eq!(sanitize_filename(".."), "unnamed_file");
    assert_eq!(sanitize_filename("../../etc/passwd"), "etcpasswd");
}

#[test]
fn slugs_are_deterministic_and_clean() {
    for input in corpus() {
        let first = generate_slug(&input);
        assert_eq!(first, generate_slug(&input));
        if first != "untitled" {
            assert!(
                first
                    .split('-')
                    .all(|run| !run.is_empty() && run.chars().all(|c| c.is_ascii_alphanumeric())),
                "bad slug {first:?} for {input:?}"
            );
            assert!(first.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }
    }
    assert_eq!(generate_slug("Año Nuevo Fiesta!"), "ano-nuevo-fiesta");
}

#[test]
fn email_contract() {
    assert_eq!(sanitize_email("USER@Example.COM ").unwrap(), "user@example.com");
    assert!(matches!(
        sanitize_email("not-an-email"),
        Err(SanitizeError::InvalidFormat { .. })
    ));
}

#[test]
fn sql_filter_examples() {
    assert_eq!(filter_sql("1 OR 1=1"), FILTERED);
    assert_eq!(filter_sql("please select an option"), "please select an option");
    assert_eq!(
        filter_sql("I select my favorite color"),
        "I select my favorite color"
    );
}

#[test]
fn xss_filter_examples() {
    assert_eq!(filter_xss("<img src=x onerror=alert(1)>"), FILTERED);
    assert_eq!(filter_xss("<script>alert(1)</script>"), FILTERED);
    assert_eq!(filter_xss("a perfectly normal sentence"), "a perfectly normal sentence");
}

#[test]
fn path_traversal_examples() {
    assert_eq!(sanitize_path("../../etc/passwd"), "etc/passwd");
    assert_eq!(sanitize_path("..\\..\\windows\\system32"), "windows/system32");
    assert_eq!(sanitize_url("https://example.gov.ph/services?id=42"), "https://example.gov.ph/services?id=42");
}

#[test]
fn full_pipeline_is_stable_on_second_pass() {
    for input in corpus() {
        let once = sanitize_value(&input);
        let twice = sanitize_value(&once);
        // Re-encoding existing entities is the only permitted difference;
        // no new sentinel may ever appear.
        assert_eq!(
            once.matches(FILTERED).count(),
            twice.matches(FILTERED).count(),
            "second pass changed filtering for {input:?}"
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Middleware End-to-End
// ═══════════════════════════════════════════════════════════════════════════════

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn app() -> InputSanitizerService<Router> {
    let router = Router::new()
        .route(
            "/residents",
            post(|body: String| async move { body }),
        )
        .route(
            "/documents/:name",
            axum::routing::get(|axum::extract::Path(name): axum::extract::Path<String>| async move {
                name
            }),
        );
    InputSanitizerLayer::new(SanitizeConfig::default()).layer(router)
}

#[tokio::test]
async fn middleware_sanitizes_json_request_body() {
    let payload = json!({
        "first_name": "  Juan  ",
        "complaint": "<script>alert('xss')</script>",
        "household": {"members": 4, "notes": "1 OR 1=1"}
    });
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/residents")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let seen = body_json(response).await;
    assert_eq!(seen["first_name"], json!("Juan"));
    assert_eq!(seen["complaint"], json!(FILTERED));
    assert_eq!(seen["household"]["members"], json!("4"));
    assert_eq!(seen["household"]["notes"], json!(FILTERED));
}

#[tokio::test]
async fn middleware_sanitizes_route_captures() {
    // Hostile path segments must be rewritten before routing resolves the
    // capture, so the handler never sees the raw markup.
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/documents/%3Cscript%3Ealert(1)%3C%2Fscript%3E")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(String::from_utf8(bytes.to_vec()).unwrap(), FILTERED);
}

#[tokio::test]
async fn middleware_rejects_oversized_body_with_envelope() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/residents")
                .header("content-type", "application/json")
                .header("content-length", "10485760")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let envelope = body_json(response).await;
    assert_eq!(envelope["success"], json!(false));
    assert_eq!(envelope["error"]["code"], json!("PAYLOAD_TOO_LARGE"));
    assert!(envelope["error"]["numeric_code"].is_number());
}
