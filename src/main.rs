use relatorio::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relatorio=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    let state = relatorio::init_state(config).await?;
    let app = relatorio::build_router(state);

    tracing::info!("Relatorio listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
