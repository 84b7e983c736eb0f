//! Request correlation.
//!
//! Every request passing through [`CorrelationIdLayer`] is tagged with a
//! [`CorrelationId`]: the caller's `X-Correlation-ID` when it holds a valid
//! UUID, a fresh v4 otherwise. Handlers read it back through the
//! [`CorrelationId`] extractor, log lines emitted while handling the request
//! carry it through the `http_request` span, and the response returns it to
//! the caller.
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/reservation", post(create_reservation))
//!     .layer(correlation_id_layer());
//! ```

use crate::extractors::CorrelationId;
use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    response::Response,
};
use futures::future::BoxFuture;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

/// Header carrying the correlation id in both directions.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Shorthand for [`CorrelationIdLayer`].
#[must_use]
pub const fn correlation_id_layer() -> CorrelationIdLayer {
    CorrelationIdLayer
}

/// Tags requests with a [`CorrelationId`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CorrelationIdLayer;

impl<S> Layer<S> for CorrelationIdLayer {
    type Service = CorrelationIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorrelationIdService { inner }
    }
}

/// Service produced by [`CorrelationIdLayer`].
#[derive(Clone, Debug)]
pub struct CorrelationIdService<S> {
    inner: S,
}

impl<S> Service<Request> for CorrelationIdService<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request) -> Self::Future {
        let id = incoming_id(request.headers()).unwrap_or_else(Uuid::new_v4);
        request.extensions_mut().insert(CorrelationId(id));

        let span = tracing::info_span!(
            "http_request",
            correlation_id = %id,
            method = %request.method(),
            path = %request.uri().path(),
        );
        let started = Instant::now();
        let pending = self.inner.call(request);

        Box::pin(
            async move {
                let mut response = pending.await?;
                tracing::debug!(
                    status = response.status().as_u16(),
                    elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "Request finished"
                );
                echo(&mut response, id);
                Ok(response)
            }
            .instrument(span),
        )
    }
}

fn incoming_id(headers: &HeaderMap) -> Option<Uuid> {
    let raw = headers.get(CORRELATION_ID_HEADER)?.to_str().ok()?;
    Uuid::parse_str(raw.trim()).ok()
}

fn echo(response: &mut Response, id: Uuid) {
    // A hyphenated UUID is always a valid header value
    if let Ok(value) = HeaderValue::from_str(&id.hyphenated().to_string()) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, routing::get};
    use tower::ServiceExt;

    async fn roundtrip(header: Option<&str>) -> (Option<String>, String) {
        let app = Router::new()
            .route("/ping", get(|id: CorrelationId| async move { id.0.to_string() }))
            .layer(correlation_id_layer());

        let mut builder = Request::builder().uri("/ping");
        if let Some(value) = header {
            builder = builder.header(CORRELATION_ID_HEADER, value);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();

        let echoed = response
            .headers()
            .get(CORRELATION_ID_HEADER)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (echoed, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn missing_header_gets_a_fresh_id() {
        let (echoed, seen_by_handler) = roundtrip(None).await;
        let echoed = echoed.unwrap();
        assert!(Uuid::parse_str(&echoed).is_ok());
        assert_eq!(echoed, seen_by_handler);
    }

    #[tokio::test]
    async fn caller_id_is_kept() {
        let id = Uuid::new_v4().to_string();
        let (echoed, seen_by_handler) = roundtrip(Some(&id)).await;
        assert_eq!(echoed.as_deref(), Some(id.as_str()));
        assert_eq!(seen_by_handler, id);
    }

    #[tokio::test]
    async fn garbage_header_is_replaced() {
        let (echoed, _) = roundtrip(Some("reservation-42")).await;
        let echoed = echoed.unwrap();
        assert_ne!(echoed, "reservation-42");
        assert!(Uuid::parse_str(&echoed).is_ok());
    }
}
