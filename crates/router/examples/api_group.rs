use bytes::Bytes;
use futures::FutureExt;
use http::{Method, Request, StatusCode};
use http_body_util::{BodyExt, Full};
use micro_router::{handler_fn, sync_handler, ReqBody, RequestContext, Router, RouterConfig};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

fn show_user(req: RequestContext<'_>) -> String {
    format!("user {}\r\n", req.param("name").unwrap_or_default())
}

fn fallback_router() -> Router {
    let mut legacy = Router::new();
    legacy.get("/legacy/*path", sync_handler(|req| format!("legacy {}\r\n", req.param("path").unwrap_or_default()))).unwrap();
    legacy
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config: RouterConfig = serde_json::from_str(r#"{ "handle_options": true }"#).expect("valid router config");
    let mut router = Router::with_config(config);

    router.get("/", sync_handler(|_| "Welcome!\r\n")).unwrap();
    {
        let mut api = router.group("/api");
        api.get("/users/:name", sync_handler(show_user)).unwrap();
        api.post(
            "/users/:name",
            handler_fn(|req: RequestContext<'_>, body: ReqBody| {
                async move {
                    let bytes = body.collect().await.map(|collected| collected.to_bytes()).unwrap_or_default();
                    (StatusCode::CREATED, format!("created {} ({} bytes)\r\n", req.param("name").unwrap_or_default(), bytes.len()))
                }
                .boxed()
            }),
        )
        .unwrap();
        api.get("/panic", sync_handler(|_| -> &'static str { panic!("boom") })).unwrap();
    }

    router.set_panic_handler(|req, _payload| (StatusCode::INTERNAL_SERVER_ERROR, format!("recovered at {}\r\n", req.uri().path())));
    router.set_not_found(fallback_router());

    info!(router = ?router, "router ready");

    let requests = [
        (Method::GET, "/api/users/gordon", ""),
        (Method::POST, "/api/users/gordon", "{\"zip\":\"world\"}"),
        (Method::GET, "/API/Users/gordon/", ""),
        (Method::DELETE, "/api/users/gordon", ""),
        (Method::OPTIONS, "/api/users/gordon", ""),
        (Method::GET, "/api/panic", ""),
        (Method::GET, "/legacy/static/app.js", ""),
        (Method::GET, "/nope", ""),
    ];

    for (method, uri, body) in requests {
        let request = Request::builder().method(method.clone()).uri(uri).body(Full::new(Bytes::from(body))).unwrap();

        match router.serve(request).await {
            Ok(response) => {
                let status = response.status();
                let headers = response.headers().clone();
                let body = response.into_body().collect().await.map(|collected| collected.to_bytes()).unwrap_or_default();
                info!(%method, uri, status = status.as_u16(), ?headers, body = %String::from_utf8_lossy(&body).trim_end(), "served");
            }
            Err(e) => error!(%method, uri, cause = %e, "handler failed"),
        }
    }
}
