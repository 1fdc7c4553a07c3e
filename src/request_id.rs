use axum::{
    body::Body,
    http::{HeaderValue, Request},
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

#[derive(Clone)]
pub struct RequestUuid;

impl MakeRequestId for RequestUuid {
    fn make_request_id<B>(&mut self, _: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// The id set by `SetRequestIdLayer`, or whatever the caller sent us.
pub fn from_x_request_id(request: &Request<Body>) -> Option<&str> {
    let value = request.headers().get("x-request-id")?;
    value
        .to_str()
        .map_err(|e| tracing::warn!("Non-ascii x-request-id header: {e:?}"))
        .ok()
}
