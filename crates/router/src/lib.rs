//! A radix trie HTTP request router
//!
//! This crate maps a method and a URL path to a registered handler and the
//! path parameters bound along the way. Every method owns one compressed
//! trie. Lookups borrow parameter names from the trie and values from the
//! request path, and a route without parameters never allocates.
//!
//! # Features
//!
//! - Named parameters (`/user/:name`) and catch-all tails (`/src/*filepath`)
//! - Static routes and parameters side by side, statics win with backtracking
//! - Trailing slash and case-insensitive redirects (301 for `GET`/`HEAD`, 307 otherwise)
//! - `405 Method Not Allowed` with a sorted `Allow` header, automatic `OPTIONS` replies
//! - Not-found, method-not-allowed and panic hooks, routers chain into each other
//! - Prefix groups
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use http::{Request, StatusCode};
//! use http_body_util::{BodyExt, Empty};
//! use micro_router::{sync_handler, Router};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut router = Router::new();
//! router.get("/", sync_handler(|_| "Welcome!")).unwrap();
//! router
//!     .get("/hello/:name", sync_handler(|req| format!("hello, {}!", req.param("name").unwrap_or_default())))
//!     .unwrap();
//!
//! let request = Request::get("/hello/gordon").body(Empty::<Bytes>::new()).unwrap();
//! let response = router.serve(request).await.unwrap();
//! assert_eq!(response.status(), StatusCode::OK);
//!
//! let body = response.into_body().collect().await.unwrap().to_bytes();
//! assert_eq!(body, "hello, gordon!");
//!
//! let request = Request::get("/HELLO/gordon/").body(Empty::<Bytes>::new()).unwrap();
//! let response = router.serve(request).await.unwrap();
//! assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
//! assert_eq!(response.headers()["location"], "/hello/gordon");
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`tree`]: the generic trie, usable on its own
//! - [`Router`]: one trie per method plus redirect, `405` and fallback policy
//! - [`RequestHandler`]: the capability every route target implements
//! - [`Responder`]: conversion of handler results into responses

mod body;
mod config;
mod error;
mod handler;
mod params;
mod path;
mod request;
mod responder;

pub mod router;
pub mod tree;

pub use body::{empty_req_body, req_body, BoxError, ReqBody, ResponseBody};
pub use config::RouterConfig;
pub use error::{InsertError, MatchError, RouteError};
pub use handler::{handler_fn, sync_handler, FnHandler, RequestHandler, SyncFnHandler};
pub use params::{Param, Params};
pub use path::clean_path;
pub use request::RequestContext;
pub use responder::Responder;
pub use router::{Group, Route, RouteResult, Router};
