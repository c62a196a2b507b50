//! A small example demonstrating how to register routes and dispatch requests with microroute.

use log::info;
use microroute::{compose, Context, Handler, Method, Next, Router, RouterError};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), RouterError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let router = Router::new();

    router
        .get(
            "/users/:id",
            vec![Handler::new(|mut ctx: Context, next: Next| async move {
                let id = ctx.param("id").unwrap_or_default().to_string();
                ctx.respond_json(200, &json!({ "id": id }))?;
                next.run(ctx).await
            })],
        )
        .await?
        .post(
            "/users",
            vec![Handler::new(|mut ctx: Context, next: Next| async move {
                ctx.respond_json(201, &json!({ "created": true }))?;
                next.run(ctx).await
            })],
        )
        .await?;

    // Everything below is served under /api from now on
    router.set_prefix("/api").await?;
    router.log_routes().await;

    // Mount the dispatcher in an outer chain with a fallback for unmatched requests
    let dispatch = router.middleware(false).await?.into_modern();
    let fallback = Handler::new(|mut ctx: Context, next: Next| async move {
        if ctx.status.is_none() {
            ctx.respond_json(404, &json!({ "error": "not found" }))?;
        }
        next.run(ctx).await
    })
    .into_modern();
    let app = compose(vec![dispatch, fallback]);

    for (method, path) in [
        (Method::GET, "/api/users/42?verbose=1"),
        (Method::POST, "/api/users"),
        (Method::DELETE, "/api/users/42"),
        (Method::GET, "/users/42"),
    ] {
        let ctx = app(Context::new(method, path), Next::end()).await?;
        info!(
            "{} {} -> {} {}",
            method,
            path,
            ctx.status.unwrap_or_default(),
            ctx.body.unwrap_or_default()
        );
    }

    Ok(())
}
