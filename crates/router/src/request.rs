//! Per-request data handed to handlers.
//!
//! A [`RequestContext`] borrows the request head and the parameters bound by
//! the route match. Nothing is copied out of the request, and a request that
//! matched no parameters shares one static empty list.

use crate::params::Params;
use http::request::Parts;
use http::{HeaderMap, Method, Uri, Version};

/// Represents the context of an HTTP request: its head and the path
/// parameters extracted by the router.
///
/// The context is `Copy`, so it can be passed by value into handler futures
/// while the router keeps ownership of the request head.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    parts: &'a Parts,
    params: &'a Params<'a, 'a>,
}

impl<'a> RequestContext<'a> {
    pub fn new(parts: &'a Parts, params: &'a Params<'a, 'a>) -> Self {
        Self { parts, params }
    }

    /// A context without path parameters.
    pub fn without_params(parts: &'a Parts) -> Self {
        Self { parts, params: Params::empty_ref() }
    }

    pub fn parts(&self) -> &'a Parts {
        self.parts
    }

    pub fn method(&self) -> &'a Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &'a Uri {
        &self.parts.uri
    }

    pub fn version(&self) -> Version {
        self.parts.version
    }

    pub fn headers(&self) -> &'a HeaderMap {
        &self.parts.headers
    }

    pub fn params(&self) -> &'a Params<'a, 'a> {
        self.params
    }

    /// Returns the first value bound to `name`, if any.
    pub fn param(&self, name: impl AsRef<str>) -> Option<&'a str> {
        self.params.get(name)
    }
}
