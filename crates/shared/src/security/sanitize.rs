use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorInternalServerError, ErrorPayloadTooLarge, PayloadError},
    http::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE},
    web::{Bytes, BytesMut},
    Error, HttpMessage,
};
use futures_util::future::{self, ready, LocalBoxFuture, Ready};
use futures_util::{Stream, StreamExt};
use serde_json::Value;
use std::pin::Pin;
use std::rc::Rc;

const MAX_JSON_BODY: usize = 1_048_576;

/// Input sanitization middleware for JSON bodies. Buffers the payload,
/// removes object keys usable as query-injection vectors in the document
/// store (leading `$` or embedded `.`), HTML-escapes angle brackets in
/// string values, then re-injects the cleaned payload for the extractors
/// downstream. Non-JSON requests pass through untouched.
#[derive(Default)]
pub struct SanitizeInput;

impl<S, B> Transform<S, ServiceRequest> for SanitizeInput
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SanitizeInputMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SanitizeInputMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct SanitizeInputMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SanitizeInputMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .map(|v| v.starts_with("application/json"))
            .unwrap_or(false);

        Box::pin(async move {
            if !is_json {
                return service.call(req).await;
            }

            let mut body = BytesMut::new();
            let mut payload = req.take_payload();
            while let Some(chunk) = payload.next().await {
                let chunk = chunk?;
                if body.len() + chunk.len() > MAX_JSON_BODY {
                    return Err(ErrorPayloadTooLarge("Request body too large"));
                }
                body.extend_from_slice(chunk.as_ref());
            }

            // Leave malformed JSON alone so the Json extractor reports the
            // parse error with its usual response.
            let cleaned = match serde_json::from_slice::<Value>(&body) {
                Ok(mut value) => {
                    sanitize_value(&mut value);
                    Bytes::from(serde_json::to_vec(&value).map_err(ErrorInternalServerError)?)
                }
                Err(_) => body.freeze(),
            };

            req.headers_mut()
                .insert(CONTENT_LENGTH, HeaderValue::from(cleaned.len()));

            let stream = futures_util::stream::once(future::ok::<Bytes, PayloadError>(cleaned));
            let boxed_stream: Pin<Box<dyn Stream<Item = Result<Bytes, PayloadError>>>> =
                Box::pin(stream);
            req.set_payload(Payload::from(boxed_stream));

            service.call(req).await
        })
    }
}

fn is_injection_key(key: &str) -> bool {
    key.starts_with('$') || key.contains('.')
}

pub fn sanitize_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|key, _| !is_injection_key(key));
            for child in map.values_mut() {
                sanitize_value(child);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                sanitize_value(item);
            }
        }
        Value::String(s) => {
            if s.contains('<') || s.contains('>') {
                *s = s.replace('<', "&lt;").replace('>', "&gt;");
            }
        }
        _ => {}
    }
}
