mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use medfinder_core::AppConfig;
use medfinder_directory::DirectoryScraper;
use medfinder_places::{GeocodingClient, HospitalLookup, PlacesClient};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = medfinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if !config.google_api_key_configured() {
        tracing::warn!(
            "GOOGLE_API_KEY is not set; hospital endpoints will answer with a configuration error"
        );
    }

    let app = build_app(build_state(&config)?);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "medfinder server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let hospitals = match config.google_api_key.as_deref() {
        Some(api_key) => {
            let places = PlacesClient::with_base_url(
                api_key,
                config.places_timeout_secs,
                &config.places_base_url,
            )?
            .with_page_delay(Duration::from_millis(config.places_page_delay_ms));
            let geocoder = GeocodingClient::with_base_url(
                api_key,
                config.places_timeout_secs,
                &config.places_base_url,
            )?;
            Some(Arc::new(HospitalLookup::new(
                Arc::new(places),
                Arc::new(geocoder),
            )))
        }
        None => None,
    };

    let directory = DirectoryScraper::with_base_url(
        &config.directory_base_url,
        config.directory_timeout_secs,
        &config.directory_user_agent,
    )?;

    Ok(AppState {
        hospitals,
        directory: Arc::new(directory),
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
