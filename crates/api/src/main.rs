use anyhow::Context;

use cashbook_api::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cashbook_observability::init();

    let config = ApiConfig::from_env().context("invalid server configuration")?;
    let app = cashbook_api::app::build_app(&config);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        base_path = %config.base_path,
        "start server"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
