//! `x-request-id` generation and propagation.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request, Response},
};
use tower::{Layer, Service};
use uuid::Uuid;

/// Header carrying the request id.
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Client-supplied ids longer than this are replaced.
pub const MAX_REQUEST_ID_LEN: usize = 128;

/// Layer that gives every request an id and echoes it on the response.
#[derive(Clone, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdMiddleware { inner }
    }
}

#[derive(Clone)]
pub struct RequestIdMiddleware<S> {
    inner: S,
}

/// Returns the incoming id if it is usable.
fn incoming_id(request: &Request<Body>) -> Option<HeaderValue> {
    let value = request.headers().get(&REQUEST_ID_HEADER)?;
    let text = value.to_str().ok()?;
    if text.is_empty() || text.len() > MAX_REQUEST_ID_LEN {
        return None;
    }
    Some(value.clone())
}

fn generate_id() -> HeaderValue {
    // A hyphenated UUID is always a valid header value.
    HeaderValue::from_str(&Uuid::new_v4().to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
}

impl<S> Service<Request<Body>> for RequestIdMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let request_id = incoming_id(&request).unwrap_or_else(generate_id);
        request
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), request_id.clone());

        let mut inner = self.inner.clone();

        Box::pin(async move {
            let mut response = inner.call(request).await?;
            response
                .headers_mut()
                .insert(REQUEST_ID_HEADER.clone(), request_id);
            Ok(response)
        })
    }
}
