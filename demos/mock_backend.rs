//! Stand-in for the device-side media backend, for manual testing.
//!
//! Run with `cargo run --example mock_backend`, then point the proxy at it:
//! `UPSTREAM_HOST=127.0.0.1 UPSTREAM_PORT=8081 cargo run`.

use axum::{extract::Query, routing::get, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;

#[derive(Deserialize)]
struct StreamParams {
    url: String,
}

async fn stream(Query(params): Query<StreamParams>) -> Json<Value> {
    Json(json!({
        "title": "Pretend Track",
        "stream_url": format!("https://cdn.example/resolved?src={}", params.url),
    }))
}

#[tokio::main]
async fn main() {
    let app = Router::new()
        .route("/kaithhealthcheck", get(|| async { "ok" }))
        .route("/stream", get(stream));

    let addr = SocketAddr::from(([127, 0, 0, 1], 8081));
    println!("Mock media backend listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
