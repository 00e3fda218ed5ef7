use super::Router;
use crate::error::{InsertError, RouteError};
use crate::handler::RequestHandler;
use http::Method;

/// Registers routes on a [`Router`] below a common path prefix.
///
/// ```
/// use micro_router::{sync_handler, Router};
///
/// let mut router = Router::new();
/// let mut api = router.group("/api");
/// api.get("/users/:name", sync_handler(|_| "user")).unwrap();
///
/// assert!(router.lookup(&http::Method::GET, "/api/users/gordon").handler().is_some());
/// ```
#[derive(Debug)]
pub struct Group<'r> {
    prefix: String,
    router: &'r mut Router,
}

impl<'r> Group<'r> {
    pub(crate) fn new(router: &'r mut Router, prefix: &str) -> Self {
        Self { prefix: prefix.strip_suffix('/').unwrap_or(prefix).to_owned(), router }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// A nested group, `prefix` is appended to this group's prefix.
    pub fn group(&mut self, prefix: &str) -> Group<'_> {
        let prefix = format!("{}{}", self.prefix, prefix);
        Group::new(self.router, &prefix)
    }

    /// Registers `handler` for `method` and the prefixed `pattern`.
    pub fn handle<M, H>(&mut self, method: M, pattern: &str, handler: H) -> Result<(), RouteError>
    where
        Method: TryFrom<M>,
        <Method as TryFrom<M>>::Error: Into<http::Error>,
        H: RequestHandler + 'static,
    {
        let method = Method::try_from(method).map_err(Into::<http::Error>::into)?;
        if !pattern.starts_with('/') {
            return Err(RouteError::insert(method, InsertError::missing_leading_slash(pattern)));
        }

        self.router.handle::<Method, H>(method, &format!("{}{}", self.prefix, pattern), handler)
    }

    method_route!(get, GET);
    method_route!(head, HEAD);
    method_route!(options, OPTIONS);
    method_route!(post, POST);
    method_route!(put, PUT);
    method_route!(patch, PATCH);
    method_route!(delete, DELETE);
    method_route!(connect, CONNECT);
    method_route!(trace, TRACE);
}
