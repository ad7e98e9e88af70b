//! Request sanitization middleware.
//!
//! Applies the structural walker to every inbound request before handlers
//! run: URI path segments, the query string, JSON and urlencoded form
//! bodies, and header values are all rewritten in place. Binary bodies and
//! configured exempt routes pass through untouched.
//!
//! Attach the layer around the finished `Router` (`layer.layer(router)`),
//! not through `Router::layer`: axum resolves routing before router-level
//! middleware runs, and path captures are taken from the pre-rewrite URI.
//!
//! Every rewrite is best-effort: a part that cannot be decoded keeps its
//! original bytes, because one bad field must never fail a request full of
//! benign ones. The only hard rejections are oversized URLs and bodies.

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{
        header::CONTENT_LENGTH,
        uri::PathAndQuery,
        HeaderMap, HeaderName, HeaderValue, Uri,
    },
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use metrics::counter;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::{
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::config::SanitizerSettings;
use crate::error::{BayanError, ErrorCode};
use crate::sanitize::{sanitize_structure_capped, sanitize_value_capped, MAX_FIELD_BYTES};
use crate::telemetry::preview;

/// Characters percent-encoded when sanitized path segments are written back.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'%')
    .add(b'/')
    .add(b'\\')
    .add(b'^')
    .add(b'|')
    .add(b'[')
    .add(b']');

// ═══════════════════════════════════════════════════════════════════════════════
// Configuration
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct SanitizeConfig {
    /// Master switch; disabled means every request passes through untouched.
    pub enabled: bool,
    /// Route prefixes exempt from sanitization (binary upload endpoints).
    pub exempt_paths: Vec<String>,
    /// Header names (lowercase) whose values are never rewritten.
    pub skip_headers: Vec<String>,
    /// Maximum body size in bytes; larger bodies are rejected with 413.
    pub max_body_bytes: usize,
    /// Per-field byte cap; longer fields are truncated, not rejected.
    pub max_field_bytes: usize,
    /// Maximum URL length in bytes; longer URLs are rejected with 414.
    pub max_url_length: usize,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            exempt_paths: vec![],
            skip_headers: vec![
                "authorization".into(),
                "cookie".into(),
                "user-agent".into(),
                "accept".into(),
                "content-type".into(),
                "content-length".into(),
                "host".into(),
                "x-request-id".into(),
                "x-forwarded-for".into(),
                "x-csrf-token".into(),
                "x-api-key".into(),
            ],
            max_body_bytes: 1_048_576,
            max_field_bytes: MAX_FIELD_BYTES,
            max_url_length: 2048,
        }
    }
}

impl From<&SanitizerSettings> for SanitizeConfig {
    fn from(settings: &SanitizerSettings) -> Self {
        Self {
            enabled: settings.enabled,
            exempt_paths: settings.exempt_paths.clone(),
            max_body_bytes: settings.max_body_bytes,
            max_field_bytes: settings.max_field_bytes,
            max_url_length: settings.max_url_length,
            ..Default::default()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Layer / Service
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct InputSanitizerLayer {
    config: Arc<SanitizeConfig>,
}

impl InputSanitizerLayer {
    pub fn new(config: SanitizeConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl<S> Layer<S> for InputSanitizerLayer {
    type Service = InputSanitizerService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InputSanitizerService {
            inner,
            config: self.config.clone(),
        }
    }
}

#[derive(Clone)]
pub struct InputSanitizerService<S> {
    inner: S,
    config: Arc<SanitizeConfig>,
}

impl<S> Service<Request> for InputSanitizerService<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let config = self.config.clone();
        let mut inner = self.inner.clone();
        Box::pin(async move {
            let path = req.uri().path().to_string();
            if !config.enabled || config.exempt_paths.iter().any(|p| path.starts_with(p)) {
                return inner.call(req).await;
            }

            counter!("bayan_sanitizer_requests_total").increment(1);

            if req.uri().to_string().len() > config.max_url_length {
                counter!("bayan_sanitizer_url_rejected_total").increment(1);
                warn!(path = %path, "URL exceeds length limit");
                return Ok(
                    BayanError::new(ErrorCode::UrlTooLong, "URL too long").into_response()
                );
            }

            if let Some(declared) = declared_length(req.headers()) {
                if declared > config.max_body_bytes {
                    counter!("bayan_sanitizer_payload_rejected_total").increment(1);
                    warn!(path = %path, declared, "Declared body exceeds size limit");
                    return Ok(
                        BayanError::payload_too_large(config.max_body_bytes).into_response()
                    );
                }
            }

            let (mut parts, body) = req.into_parts();

            if let Some(rewritten) = sanitize_uri(&parts.uri, config.max_field_bytes) {
                debug!(path = %path, "Rewrote request URI");
                parts.uri = rewritten;
            }

            sanitize_headers(&mut parts.headers, &config.skip_headers, config.max_field_bytes);

            let body = match sanitize_body(
                &parts.headers,
                body,
                config.max_body_bytes,
                config.max_field_bytes,
            )
            .await
            {
                Ok(SanitizedBody::Unchanged(body)) => body,
                Ok(SanitizedBody::Rewritten(bytes)) => {
                    counter!("bayan_sanitizer_body_rewritten_total").increment(1);
                    if let Ok(value) = HeaderValue::from_str(&bytes.len().to_string()) {
                        parts.headers.insert(CONTENT_LENGTH, value);
                    }
                    Body::from(bytes)
                }
                Err(error) => {
                    counter!("bayan_sanitizer_payload_rejected_total").increment(1);
                    return Ok(error.into_response());
                }
            };

            inner.call(Request::from_parts(parts, body)).await
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rewrite Helpers
// ═══════════════════════════════════════════════════════════════════════════════

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<usize>().ok())
}

/// Rebuild the URI with sanitized path segments and query pairs.
///
/// Returns `None` when nothing changed or the rewritten URI would not
/// parse; the original is kept in either case.
fn sanitize_uri(uri: &Uri, max_field: usize) -> Option<Uri> {
    let original = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let new_path: String = uri
        .path()
        .split('/')
        .map(|segment| sanitize_path_segment(segment, max_field))
        .collect::<Vec<_>>()
        .join("/");

    let candidate = match uri.query() {
        Some(query) => format!("{}?{}", new_path, sanitize_query(query, max_field)),
        None => new_path,
    };

    if candidate == original {
        return None;
    }

    let path_and_query: PathAndQuery = candidate.parse().ok()?;
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    Uri::from_parts(parts).ok()
}

/// Sanitize one percent-decoded path segment, re-encoding the result.
/// Segments that do not decode as UTF-8 are kept verbatim.
fn sanitize_path_segment(segment: &str, max_field: usize) -> String {
    if segment.is_empty() {
        return String::new();
    }
    match percent_decode_str(segment).decode_utf8() {
        Ok(decoded) => {
            let clean = sanitize_value_capped(&decoded, max_field);
            utf8_percent_encode(&clean, PATH_SEGMENT).to_string()
        }
        Err(_) => segment.to_string(),
    }
}

fn sanitize_query(query: &str, max_field: usize) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        serializer.append_pair(
            &sanitize_value_capped(&key, max_field),
            &sanitize_value_capped(&value, max_field),
        );
    }
    serializer.finish()
}

/// Rewrite header names and values in place, honoring the skip list.
///
/// A name that sanitizes into an invalid header token keeps its original
/// name; a value that cannot be represented after rewriting is dropped.
fn sanitize_headers(headers: &mut HeaderMap, skip: &[String], max_field: usize) {
    let mut rewritten: Vec<(HeaderName, HeaderValue)> = Vec::with_capacity(headers.len());
    let mut changed = false;

    for (name, value) in headers.iter() {
        if skip.iter().any(|s| s == name.as_str()) {
            rewritten.push((name.clone(), value.clone()));
            continue;
        }

        let out_name = {
            let clean = sanitize_value_capped(name.as_str(), max_field);
            if clean != name.as_str() {
                HeaderName::from_bytes(clean.as_bytes()).unwrap_or_else(|_| name.clone())
            } else {
                name.clone()
            }
        };

        match value.to_str() {
            Ok(text) => {
                let clean = sanitize_value_capped(text, max_field);
                if clean == text && out_name == *name {
                    rewritten.push((name.clone(), value.clone()));
                } else if let Ok(out_value) = HeaderValue::from_str(&clean) {
                    changed = true;
                    debug!(header = %name, original = %preview(text), "Rewrote header value");
                    rewritten.push((out_name, out_value));
                } else {
                    changed = true;
                    warn!(header = %name, "Dropped unrepresentable header value");
                }
            }
            // Opaque bytes: nothing the text pipeline can safely do.
            Err(_) => rewritten.push((name.clone(), value.clone())),
        }
    }

    if changed {
        counter!("bayan_sanitizer_headers_rewritten_total").increment(1);
        headers.clear();
        for (name, value) in rewritten {
            headers.append(name, value);
        }
    }
}

enum SanitizedBody {
    Unchanged(Body),
    Rewritten(Vec<u8>),
}

/// Collect and rewrite a JSON or urlencoded form body.
///
/// Other content types pass through unchanged. A body that exceeds the cap
/// while being read fails with `PayloadTooLarge`; a body that fails to
/// parse keeps its original bytes.
async fn sanitize_body(
    headers: &HeaderMap,
    body: Body,
    max_bytes: usize,
    max_field: usize,
) -> Result<SanitizedBody, BayanError> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    let is_json = content_type.starts_with("application/json");
    let is_form = content_type.starts_with("application/x-www-form-urlencoded");
    if !is_json && !is_form {
        return Ok(SanitizedBody::Unchanged(body));
    }

    let bytes = to_bytes(body, max_bytes)
        .await
        .map_err(|_| BayanError::payload_too_large(max_bytes))?;

    if is_json {
        match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(value) => {
                let clean = sanitize_structure_capped(&value, max_field);
                let out = serde_json::to_vec(&clean).unwrap_or_else(|_| bytes.to_vec());
                Ok(SanitizedBody::Rewritten(out))
            }
            Err(_) => {
                debug!("JSON body did not parse; passing through unchanged");
                Ok(SanitizedBody::Rewritten(bytes.to_vec()))
            }
        }
    } else {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in form_urlencoded::parse(&bytes) {
            serializer.append_pair(
                &sanitize_value_capped(&key, max_field),
                &sanitize_value_capped(&value, max_field),
            );
        }
        Ok(SanitizedBody::Rewritten(serializer.finish().into_bytes()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
