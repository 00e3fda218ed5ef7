use super::{Route, Router};
use crate::body::{req_body, BoxError, ReqBody, ResponseBody};
use crate::handler::RequestHandler;
use crate::request::RequestContext;
use crate::responder::{with_content_type, TEXT_PLAIN_UTF_8};
use async_trait::async_trait;
use bytes::Bytes;
use futures::FutureExt;
use http::header::{ALLOW, LOCATION};
use http::request::Parts;
use http::{HeaderValue, Method, Request, Response, StatusCode};
use http_body::Body as HttpBody;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error};

impl Router {
    /// Answers a complete request.
    ///
    /// Handler errors are returned unchanged, every routing outcome is a response.
    pub async fn serve<B>(&self, req: Request<B>) -> Result<Response<ResponseBody>, BoxError>
    where
        B: HttpBody<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = req.into_parts();
        self.dispatch(&parts, req_body(body)).await
    }

    /// Resolves the request head and runs whatever the outcome calls for.
    pub async fn dispatch(&self, parts: &Parts, req_body: ReqBody) -> Result<Response<ResponseBody>, BoxError> {
        let path = parts.uri.path();

        match self.resolve(&parts.method, path) {
            Route::Dispatch { handler, params } => {
                self.call_guarded(handler, RequestContext::new(parts, &params), req_body).await
            }

            Route::Redirect { location, status } => {
                debug!(method = %parts.method, path, %location, status = status.as_u16(), "redirecting");
                let location = match parts.uri.query() {
                    Some(query) => format!("{location}?{query}"),
                    None => location,
                };

                let mut response = Response::new(ResponseBody::empty());
                *response.status_mut() = status;
                response.headers_mut().insert(LOCATION, HeaderValue::try_from(location)?);
                Ok(response)
            }

            Route::MethodNotAllowed { allow } => {
                let allow = HeaderValue::try_from(allow)?;

                if parts.method == Method::OPTIONS && self.config.handle_options {
                    debug!(path, ?allow, "answering OPTIONS");
                    let mut response = Response::new(ResponseBody::empty());
                    response.headers_mut().insert(ALLOW, allow);
                    return Ok(response);
                }

                debug!(method = %parts.method, path, ?allow, "method not allowed");
                let mut response = match &self.method_not_allowed {
                    Some(handler) => {
                        self.call_guarded(handler.as_ref(), RequestContext::without_params(parts), req_body).await?
                    }
                    None => {
                        let mut response = with_content_type(ResponseBody::from("Method Not Allowed"), TEXT_PLAIN_UTF_8);
                        *response.status_mut() = StatusCode::METHOD_NOT_ALLOWED;
                        response
                    }
                };
                response.headers_mut().entry(ALLOW).or_insert(allow);
                Ok(response)
            }

            Route::NotFound => {
                debug!(method = %parts.method, path, "no route found");
                match &self.not_found {
                    Some(handler) => {
                        self.call_guarded(handler.as_ref(), RequestContext::without_params(parts), req_body).await
                    }
                    None => {
                        let mut response = with_content_type(ResponseBody::from("404 page not found"), TEXT_PLAIN_UTF_8);
                        *response.status_mut() = StatusCode::NOT_FOUND;
                        Ok(response)
                    }
                }
            }
        }
    }

    /// Runs `handler`, recovering a panic when a panic handler is configured.
    async fn call_guarded(
        &self,
        handler: &dyn RequestHandler,
        req: RequestContext<'_>,
        req_body: ReqBody,
    ) -> Result<Response<ResponseBody>, BoxError> {
        let Some(panic_handler) = &self.panic_handler else {
            return handler.invoke(req, req_body).await;
        };

        match AssertUnwindSafe(async move { handler.invoke(req, req_body).await }).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => {
                error!(method = %req.method(), path = req.uri().path(), "handler panicked");
                Ok(panic_handler(&req, payload))
            }
        }
    }
}

/// A router can be the target of another router, e.g. as its not-found handler.
#[async_trait]
impl RequestHandler for Router {
    async fn invoke<'a>(&self, req: RequestContext<'a>, req_body: ReqBody) -> Result<Response<ResponseBody>, BoxError> {
        self.dispatch(req.parts(), req_body).await
    }
}
