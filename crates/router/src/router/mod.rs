//! The method-aware router built on top of one [`Tree`] per HTTP method.
//!
//! Registration happens through `&mut Router` during setup. Once serving
//! starts the router is only read, so it can be shared behind an `Arc`
//! by any number of concurrent requests.

use crate::config::RouterConfig;
use crate::error::RouteError;
use crate::handler::RequestHandler;
use crate::params::Params;
use crate::path::clean_path;
use crate::request::RequestContext;
use crate::responder::Responder;
use crate::tree::Tree;
use crate::ResponseBody;
use http::{Method, Response, StatusCode};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

macro_rules! method_route {
    ($fn_name:ident, $method:ident) => {
        #[doc = concat!("Registers a `", stringify!($method), "` route.")]
        pub fn $fn_name<H: RequestHandler + 'static>(&mut self, pattern: &str, handler: H) -> Result<(), RouteError> {
            self.handle(Method::$method, pattern, handler)
        }
    };
}

mod dispatch;
mod group;

pub use group::Group;

type BoxedHandler = Box<dyn RequestHandler>;
type PanicHandler = Box<dyn Fn(&RequestContext<'_>, Box<dyn Any + Send>) -> Response<ResponseBody> + Send + Sync>;

pub struct Router {
    trees: HashMap<Method, Tree<BoxedHandler>>,
    config: RouterConfig,
    not_found: Option<BoxedHandler>,
    method_not_allowed: Option<BoxedHandler>,
    panic_handler: Option<PanicHandler>,
}

/// The raw outcome of [`Router::lookup`].
pub struct RouteResult<'router, 'req> {
    handler: Option<&'router dyn RequestHandler>,
    params: Params<'router, 'req>,
    tsr: bool,
}

/// What the router decided to do with a request, see [`Router::resolve`].
pub enum Route<'router, 'req> {
    Dispatch { handler: &'router dyn RequestHandler, params: Params<'router, 'req> },
    Redirect { location: String, status: StatusCode },
    MethodNotAllowed { allow: String },
    NotFound,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    pub fn with_config(config: RouterConfig) -> Self {
        Self { trees: HashMap::new(), config, not_found: None, method_not_allowed: None, panic_handler: None }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RouterConfig {
        &mut self.config
    }

    /// Registers `handler` for `method` and `pattern`.
    ///
    /// `method` may be any token `http::Method` accepts, extension methods
    /// included. Registering the same method and pattern twice fails and
    /// keeps the first handler.
    pub fn handle<M, H>(&mut self, method: M, pattern: &str, handler: H) -> Result<(), RouteError>
    where
        Method: TryFrom<M>,
        <Method as TryFrom<M>>::Error: Into<http::Error>,
        H: RequestHandler + 'static,
    {
        let method = Method::try_from(method).map_err(Into::<http::Error>::into)?;
        self.trees
            .entry(method.clone())
            .or_default()
            .insert(pattern, Box::new(handler))
            .map_err(|source| RouteError::insert(method, source))
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

    /// Returns a view registering every route below `prefix`.
    pub fn group(&mut self, prefix: &str) -> Group<'_> {
        Group::new(self, prefix)
    }

    /// Handler used when no route matches. Defaults to a plain `404`.
    pub fn set_not_found<H: RequestHandler + 'static>(&mut self, handler: H) {
        self.not_found = Some(Box::new(handler));
    }

    /// Handler used when the path exists for other methods only.
    ///
    /// The `Allow` header is added to its response unless the handler set one.
    pub fn set_method_not_allowed<H: RequestHandler + 'static>(&mut self, handler: H) {
        self.method_not_allowed = Some(Box::new(handler));
    }

    /// Recovers panics raised by handlers and turns the payload into a response.
    pub fn set_panic_handler<F, R>(&mut self, f: F)
    where
        F: Fn(&RequestContext<'_>, Box<dyn Any + Send>) -> R + Send + Sync + 'static,
        R: Responder,
    {
        self.panic_handler = Some(Box::new(move |req: &RequestContext<'_>, payload: Box<dyn Any + Send>| {
            f(req, payload).response_to(req)
        }));
    }

    /// Matches `path` against the routes of `method` only, without any redirect or fallback policy.
    pub fn lookup<'router, 'req>(&'router self, method: &Method, path: &'req str) -> RouteResult<'router, 'req> {
        let Some(tree) = self.trees.get(method) else {
            return RouteResult::empty();
        };

        match tree.at(path) {
            Ok(matched) => RouteResult { handler: Some(matched.value.as_ref()), params: matched.params, tsr: false },
            Err(e) => RouteResult { tsr: e.tsr(), ..RouteResult::empty() },
        }
    }

    /// Decides how a request for `method` and `path` is answered.
    ///
    /// In order: an exact match, a trailing slash redirect, a redirect to the
    /// cleaned and case-corrected path, `405` when other methods have the
    /// path, and finally not found. Redirects are never produced for
    /// `CONNECT` or for `/`.
    pub fn resolve<'router, 'req>(&'router self, method: &Method, path: &'req str) -> Route<'router, 'req> {
        if let Some(tree) = self.trees.get(method) {
            match tree.at(path) {
                Ok(matched) => return Route::Dispatch { handler: matched.value.as_ref(), params: matched.params },
                Err(e) if *method != Method::CONNECT && path != "/" => {
                    let status = redirect_status(method);

                    if e.tsr() && self.config.redirect_trailing_slash {
                        return Route::Redirect { location: toggle_trailing_slash(path), status };
                    }

                    if self.config.redirect_fixed_path {
                        let fixed = tree.find_case_insensitive_path(&clean_path(path), self.config.redirect_trailing_slash);
                        if let Some(location) = fixed {
                            return Route::Redirect { location, status };
                        }
                    }
                }
                Err(_) => {}
            }
        }

        if self.config.handle_method_not_allowed || (*method == Method::OPTIONS && self.config.handle_options) {
            if let Some(allow) = self.allowed(method, path) {
                return Route::MethodNotAllowed { allow };
            }
        }

        Route::NotFound
    }

    /// The sorted, comma separated methods other than `method` that match `path`.
    ///
    /// An `OPTIONS` route is only listed next to at least one other method.
    fn allowed(&self, method: &Method, path: &str) -> Option<String> {
        let mut allow: Vec<&str> = self
            .trees
            .iter()
            .filter(|(candidate, _)| *candidate != method && **candidate != Method::OPTIONS)
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(candidate, _)| candidate.as_str())
            .collect();

        if allow.is_empty() {
            return None;
        }

        if *method != Method::OPTIONS && self.trees.get(&Method::OPTIONS).is_some_and(|tree| tree.at(path).is_ok()) {
            allow.push("OPTIONS");
        }

        allow.sort_unstable();
        Some(allow.join(", "))
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&str> = self.trees.keys().map(Method::as_str).collect();
        methods.sort_unstable();

        f.debug_struct("Router")
            .field("methods", &methods)
            .field("config", &self.config)
            .field("not_found", &self.not_found.is_some())
            .field("method_not_allowed", &self.method_not_allowed.is_some())
            .field("panic_handler", &self.panic_handler.is_some())
            .finish()
    }
}

impl<'router, 'req> RouteResult<'router, 'req> {
    fn empty() -> Self {
        Self { handler: None, params: Params::empty(), tsr: false }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handler.is_none()
    }

    pub fn handler(&self) -> Option<&'router dyn RequestHandler> {
        self.handler
    }

    pub fn params(&self) -> &Params<'router, 'req> {
        &self.params
    }

    /// Whether toggling a trailing slash would have matched.
    pub fn tsr(&self) -> bool {
        self.tsr
    }
}

impl fmt::Debug for Route<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Dispatch { params, .. } => f.debug_struct("Dispatch").field("params", params).finish_non_exhaustive(),
            Route::Redirect { location, status } => {
                f.debug_struct("Redirect").field("location", location).field("status", status).finish()
            }
            Route::MethodNotAllowed { allow } => f.debug_struct("MethodNotAllowed").field("allow", allow).finish(),
            Route::NotFound => f.write_str("NotFound"),
        }
    }
}

/// `GET` and `HEAD` are redirected permanently, other methods keep their body with a temporary redirect.
fn redirect_status(method: &Method) -> StatusCode {
    if *method == Method::GET || *method == Method::HEAD {
        StatusCode::MOVED_PERMANENTLY
    } else {
        StatusCode::TEMPORARY_REDIRECT
    }
}

fn toggle_trailing_slash(path: &str) -> String {
    match path.strip_suffix('/') {
        Some(stripped) => stripped.to_owned(),
        None => format!("{path}/"),
    }
}

#[cfg(test)]
mod tests {
    use super::{Route, Router};
    use crate::config::RouterConfig;
    use crate::error::{InsertError, RouteError};
    use crate::handler::sync_handler;
    use http::{Method, StatusCode};
    use std::sync::Arc;
    use std::thread;

    fn ok_handler() -> impl crate::RequestHandler {
        sync_handler(|_| "ok")
    }

    fn redirect_of(route: Route<'_, '_>) -> Option<(String, StatusCode)> {
        match route {
            Route::Redirect { location, status } => Some((location, status)),
            _ => None,
        }
    }

    #[test]
    fn test_lookup() {
        let mut router = Router::new();
        router.get("/user/:name", ok_handler()).unwrap();

        let result = router.lookup(&Method::GET, "/user/gopher");
        assert!(result.handler().is_some());
        assert_eq!(result.params().get("name"), Some("gopher"));
        assert!(!result.tsr());

        let result = router.lookup(&Method::GET, "/user/gopher/");
        assert!(result.is_empty());
        assert!(result.tsr());

        let result = router.lookup(&Method::POST, "/user/gopher");
        assert!(result.is_empty());
        assert!(!result.tsr());
    }

    #[test]
    fn test_lookup_on_empty_router() {
        let router = Router::new();

        for path in ["/", "/path", "/path/"] {
            let result = router.lookup(&Method::GET, path);
            assert!(result.is_empty());
            assert!(!result.tsr());
            assert!(result.params().is_empty());
        }
    }

    #[test]
    fn test_registration_errors() {
        let mut router = Router::new();
        router.handle("GET", "/", ok_handler()).unwrap();
        router.handle("MKCOL", "/dav", ok_handler()).unwrap();

        let err = router.handle(Method::GET, "/", ok_handler()).unwrap_err();
        assert_eq!(err.insert_error(), Some(&InsertError::duplicate("/")));

        let err = router.handle("BAD METHOD", "/", ok_handler()).unwrap_err();
        assert!(matches!(err, RouteError::InvalidMethod { .. }));

        let err = router.post("relative", ok_handler()).unwrap_err();
        assert!(matches!(err.insert_error(), Some(InsertError::MissingLeadingSlash { .. })));

        router.get("/user/:name", ok_handler()).unwrap();
        let err = router.get("/user/:id", ok_handler()).unwrap_err();
        assert!(matches!(err.insert_error(), Some(InsertError::WildcardConflict { .. })));

        let mkcol = Method::from_bytes(b"MKCOL").unwrap();
        assert!(router.lookup(&mkcol, "/dav").handler().is_some());
    }

    #[test]
    fn test_resolve_redirects() {
        let mut router = Router::new();
        router.get("/path", ok_handler()).unwrap();
        router.get("/dir/", ok_handler()).unwrap();
        router.get("/", ok_handler()).unwrap();
        router.patch("/path", ok_handler()).unwrap();

        let moved = StatusCode::MOVED_PERMANENTLY;
        let cases = [
            ("/path/", "/path"),
            ("/dir", "/dir/"),
            ("/PATH", "/path"),
            ("/DIR/", "/dir/"),
            ("/PATH/", "/path"),
            ("/DIR", "/dir/"),
            ("/../path", "/path"),
            ("//path", "/path"),
        ];
        for (path, location) in cases {
            assert_eq!(redirect_of(router.resolve(&Method::GET, path)), Some((location.to_owned(), moved)), "{path}");
        }

        assert_eq!(
            redirect_of(router.resolve(&Method::PATCH, "/path/")),
            Some(("/path".to_owned(), StatusCode::TEMPORARY_REDIRECT))
        );
        assert!(matches!(router.resolve(&Method::GET, "/nope"), Route::NotFound));
        assert!(matches!(router.resolve(&Method::GET, "/"), Route::Dispatch { .. }));
    }

    #[test]
    fn test_no_redirect_for_root_or_connect() {
        let mut router = Router::new();
        router.get("/a", ok_handler()).unwrap();
        router.connect("/tunnel/", ok_handler()).unwrap();

        assert!(matches!(router.resolve(&Method::GET, "/"), Route::NotFound));
        assert!(matches!(router.resolve(&Method::CONNECT, "/tunnel"), Route::NotFound));
    }

    #[test]
    fn test_redirect_switches() {
        let config = RouterConfig { redirect_trailing_slash: false, ..RouterConfig::default() };
        let mut router = Router::with_config(config);
        router.get("/path", ok_handler()).unwrap();

        assert!(matches!(router.resolve(&Method::GET, "/path/"), Route::NotFound));
        assert!(matches!(router.resolve(&Method::GET, "/PATH/"), Route::NotFound));
        assert!(redirect_of(router.resolve(&Method::GET, "/PATH")).is_some());

        router.config_mut().redirect_fixed_path = false;
        assert!(matches!(router.resolve(&Method::GET, "/PATH"), Route::NotFound));
    }

    #[test]
    fn test_method_not_allowed() {
        let mut router = Router::new();
        router.post("/path", ok_handler()).unwrap();
        router.put("/path", ok_handler()).unwrap();

        match router.resolve(&Method::GET, "/path") {
            Route::MethodNotAllowed { allow } => assert_eq!(allow, "POST, PUT"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(router.resolve(&Method::GET, "/other"), Route::NotFound));

        router.config_mut().handle_method_not_allowed = false;
        assert!(matches!(router.resolve(&Method::GET, "/path"), Route::NotFound));
    }

    #[test]
    fn test_options_routes_in_allow_list() {
        let mut router = Router::new();
        router.options("/only-options", ok_handler()).unwrap();
        router.get("/path", ok_handler()).unwrap();
        router.options("/path", ok_handler()).unwrap();

        assert!(matches!(router.resolve(&Method::GET, "/only-options"), Route::NotFound));
        match router.resolve(&Method::POST, "/path") {
            Route::MethodNotAllowed { allow } => assert_eq!(allow, "GET, OPTIONS"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_automatic_options_without_method_not_allowed() {
        let config = RouterConfig { handle_method_not_allowed: false, ..RouterConfig::default() };
        let mut router = Router::with_config(config);
        router.post("/path", ok_handler()).unwrap();
        router.get("/path", ok_handler()).unwrap();

        match router.resolve(&Method::OPTIONS, "/path") {
            Route::MethodNotAllowed { allow } => assert_eq!(allow, "GET, POST"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(router.resolve(&Method::PUT, "/path"), Route::NotFound));
    }

    #[test]
    fn test_debug_lists_methods() {
        let mut router = Router::new();
        router.post("/a", ok_handler()).unwrap();
        router.get("/a", ok_handler()).unwrap();

        let debug = format!("{router:?}");
        assert!(debug.contains(r#"methods: ["GET", "POST"]"#), "{debug}");
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_router_is_shareable() {
        assert_send_sync::<Router>();
    }

    #[test]
    fn test_concurrent_lookups() {
        let mut router = Router::new();
        router.get("/user/:name", ok_handler()).unwrap();
        router.get("/src/*filepath", ok_handler()).unwrap();
        let router = Arc::new(router);

        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let router = Arc::clone(&router);
                thread::spawn(move || {
                    for i in 0..1000 {
                        let name = format!("w{worker}n{i}");

                        let path = format!("/user/{name}");
                        let result = router.lookup(&Method::GET, &path);
                        assert_eq!(result.params().get("name"), Some(name.as_str()));

                        let path = format!("/src/{name}/lib.rs");
                        match router.resolve(&Method::GET, &path) {
                            Route::Dispatch { params, .. } => {
                                assert_eq!(params.get("filepath"), Some(format!("/{name}/lib.rs").as_str()));
                            }
                            other => panic!("unexpected {other:?}"),
                        }
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }
    }
}
