use crate::body::{BoxError, ReqBody, ResponseBody};
use crate::request::RequestContext;
use crate::responder::Responder;
use async_trait::async_trait;
use futures::future::BoxFuture;
use http::Response;
use std::marker::PhantomData;

/// The single capability every route target implements.
///
/// Closures are adapted with [`handler_fn`] or [`sync_handler`]; a
/// [`Router`](crate::Router) implements it too, so routers can be chained.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn invoke<'a>(&self, req: RequestContext<'a>, req_body: ReqBody) -> Result<Response<ResponseBody>, BoxError>;
}

/// An async closure holder, see [`handler_fn`].
pub struct FnHandler<F, R> {
    f: F,
    _phantom: PhantomData<fn() -> R>,
}

/// Wraps an async closure returning a boxed future.
///
/// ```
/// use futures::FutureExt;
/// use micro_router::{handler_fn, RequestContext, ReqBody};
///
/// let handler = handler_fn(|req: RequestContext<'_>, _body: ReqBody| {
///     async move { format!("hello {}", req.param("name").unwrap_or("stranger")) }.boxed()
/// });
/// # let _ = handler;
/// ```
pub fn handler_fn<F, R>(f: F) -> FnHandler<F, R>
where
    F: for<'a> Fn(RequestContext<'a>, ReqBody) -> BoxFuture<'a, R> + Send + Sync,
    R: Responder,
{
    FnHandler { f, _phantom: PhantomData }
}

#[async_trait]
impl<F, R> RequestHandler for FnHandler<F, R>
where
    F: for<'a> Fn(RequestContext<'a>, ReqBody) -> BoxFuture<'a, R> + Send + Sync,
    R: Responder,
{
    async fn invoke<'a>(&self, req: RequestContext<'a>, req_body: ReqBody) -> Result<Response<ResponseBody>, BoxError> {
        let responder = (self.f)(req, req_body).await;
        Ok(responder.response_to(&req))
    }
}

/// A synchronous closure holder, see [`sync_handler`].
pub struct SyncFnHandler<F, R> {
    f: F,
    _phantom: PhantomData<fn() -> R>,
}

/// Wraps a plain closure that only needs the request head and parameters.
pub fn sync_handler<F, R>(f: F) -> SyncFnHandler<F, R>
where
    F: for<'a> Fn(RequestContext<'a>) -> R + Send + Sync,
    R: Responder,
{
    SyncFnHandler { f, _phantom: PhantomData }
}

#[async_trait]
impl<F, R> RequestHandler for SyncFnHandler<F, R>
where
    F: for<'a> Fn(RequestContext<'a>) -> R + Send + Sync,
    R: Responder,
{
    async fn invoke<'a>(&self, req: RequestContext<'a>, _req_body: ReqBody) -> Result<Response<ResponseBody>, BoxError> {
        Ok((self.f)(req).response_to(&req))
    }
}
