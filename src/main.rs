use anyhow::Context;
use clap::Parser; // for cli
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use signed_url_gateway::config::{Args, BUCKET, SIGNED_URL_TTL};
use signed_url_gateway::rate_limit::sweeper;
use signed_url_gateway::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("signed_url_gateway=info".parse()?),
        )
        .init();

    // parse cli arguments (env vars are read as fallbacks)
    let args = Args::parse();
    args.validate().context("invalid configuration")?;

    let state = Arc::new(AppState::from_args(&args));

    // spawn the background sweeper
    let limiter = Arc::clone(&state.rate_limiter);
    let every = Duration::from_secs(args.sweep_interval.max(1));
    tokio::spawn(async move {
        sweeper(limiter, every).await;
    });

    let app = signed_url_gateway::app(Arc::clone(&state), &args.route);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(
        addr = %addr,
        route = %args.route,
        provider = ?args.provider,
        signer_ready = state.signer.is_some(),
        bucket = BUCKET,
        ttl_secs = SIGNED_URL_TTL.as_secs(),
        extension = args.extension.as_str(),
        site_origin = state.allow_origin(),
        "gateway running"
    );
    tracing::info!(
        "Rate limit: {} requests per {} seconds per IP",
        args.rate_limit,
        args.rate_window
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")?;
    Ok(())
}
