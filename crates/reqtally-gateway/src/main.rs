//! reqtally gateway binary.
//!
//! Startup order matters: the shared counting zone is created inside
//! `AppState::new`, before the listener is bound, so the counting endpoint
//! never serves without its zone.

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use reqtally_gateway::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "reqtally.yaml".to_string());
    let cfg = config::load_from_file(&path).expect("config load failed");
    let listen: SocketAddr = cfg
        .server
        .listen
        .parse()
        .expect("server.listen must be a valid SocketAddr");

    let state = app_state::AppState::new(cfg).expect("zone init failed");
    let app = router::build_router(state);

    tracing::info!(%listen, "reqtally-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    // ConnectInfo gives the handler the peer address the key derives from.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server failed");
}
