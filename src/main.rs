use roomlog::{api, AppState, Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roomlog=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!(
        policy = %config.no_room_policy,
        strict = config.strict_payloads,
        "Starting roomlog"
    );

    let app_state = AppState::from_config(&config)?;
    let app = api::router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr.as_str()).await?;
    info!(addr = %config.bind_addr, "Inspection API listening");
    axum::serve(listener, app).await?;

    Ok(())
}
