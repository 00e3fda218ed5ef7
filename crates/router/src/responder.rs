//! Converts handler return values into HTTP responses.
//!
//! The [`Responder`] trait defines how a value turns into a
//! `Response<ResponseBody>`. Closure handlers built with
//! [`handler_fn`](crate::handler_fn) and [`sync_handler`](crate::sync_handler)
//! as well as the router's fallback hooks return any `Responder`.

use crate::body::ResponseBody;
use crate::request::RequestContext;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Response, StatusCode};
use std::convert::Infallible;

pub(crate) const TEXT_PLAIN_UTF_8: &str = "text/plain; charset=utf-8";
const OCTET_STREAM: &str = "application/octet-stream";

/// A trait for types that can be converted into HTTP responses.
pub trait Responder {
    fn response_to(self, req: &RequestContext<'_>) -> Response<ResponseBody>;
}

impl<T: Responder, E: Responder> Responder for Result<T, E> {
    fn response_to(self, req: &RequestContext<'_>) -> Response<ResponseBody> {
        match self {
            Ok(t) => t.response_to(req),
            Err(e) => e.response_to(req),
        }
    }
}

/// `None` is an empty `200 OK`.
impl<T: Responder> Responder for Option<T> {
    fn response_to(self, req: &RequestContext<'_>) -> Response<ResponseBody> {
        match self {
            Some(t) => t.response_to(req),
            None => Response::new(ResponseBody::empty()),
        }
    }
}

impl<B> Responder for Response<B>
where
    B: Into<ResponseBody>,
{
    fn response_to(self, _req: &RequestContext<'_>) -> Response<ResponseBody> {
        self.map(Into::into)
    }
}

impl<T: Responder> Responder for (StatusCode, T) {
    fn response_to(self, req: &RequestContext<'_>) -> Response<ResponseBody> {
        let (status, responder) = self;
        let mut response = responder.response_to(req);
        *response.status_mut() = status;
        response
    }
}

impl<T: Responder> Responder for Box<T> {
    fn response_to(self, req: &RequestContext<'_>) -> Response<ResponseBody> {
        (*self).response_to(req)
    }
}

impl Responder for () {
    fn response_to(self, _req: &RequestContext<'_>) -> Response<ResponseBody> {
        Response::new(ResponseBody::empty())
    }
}

impl Responder for StatusCode {
    fn response_to(self, _req: &RequestContext<'_>) -> Response<ResponseBody> {
        let mut response = Response::new(ResponseBody::empty());
        *response.status_mut() = self;
        response
    }
}

impl Responder for &'static str {
    fn response_to(self, _req: &RequestContext<'_>) -> Response<ResponseBody> {
        with_content_type(ResponseBody::from(self), TEXT_PLAIN_UTF_8)
    }
}

impl Responder for String {
    fn response_to(self, _req: &RequestContext<'_>) -> Response<ResponseBody> {
        with_content_type(ResponseBody::from(self), TEXT_PLAIN_UTF_8)
    }
}

impl Responder for Bytes {
    fn response_to(self, _req: &RequestContext<'_>) -> Response<ResponseBody> {
        with_content_type(ResponseBody::from(self), OCTET_STREAM)
    }
}

impl Responder for Infallible {
    fn response_to(self, _req: &RequestContext<'_>) -> Response<ResponseBody> {
        match self {}
    }
}

pub(crate) fn with_content_type(body: ResponseBody, content_type: &'static str) -> Response<ResponseBody> {
    let mut response = Response::new(body);
    response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
