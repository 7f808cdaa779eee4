use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use transit_navigator::resolve::{Navigator, ResolverConfig};
use transit_navigator::upstream::{MockTransitSource, TransitClient, TransitConfig, TransitSource};
use transit_navigator::web::{AppState, create_router};

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let addr: SocketAddr = std::env::var("TRANSIT_LISTEN_ADDR")
        .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
        .parse()
        .expect("TRANSIT_LISTEN_ADDR is not a socket address");

    let config = ResolverConfig::default();

    // Canned payloads stand in for the live API when a fixture directory is given
    if let Ok(dir) = std::env::var("TRANSIT_FIXTURES_DIR") {
        let source = MockTransitSource::from_dir(&dir).expect("Failed to load fixtures");
        info!(%dir, "serving canned transit data");
        serve(Navigator::new(source, config), addr).await;
        return;
    }

    let api_key = std::env::var("TRANSIT_API_KEY").unwrap_or_else(|_| {
        warn!("TRANSIT_API_KEY not set. API calls will fail.");
        String::new()
    });

    let mut transit_config = TransitConfig::new(api_key);
    if let Ok(base_url) = std::env::var("TRANSIT_BASE_URL") {
        transit_config = transit_config.with_base_url(base_url);
    }

    let client = TransitClient::new(transit_config).expect("Failed to create transit client");
    serve(Navigator::new(client, config), addr).await;
}

async fn serve<S: TransitSource + 'static>(navigator: Navigator<S>, addr: SocketAddr) {
    let app = create_router(AppState::new(navigator));

    info!("Transit navigator listening on http://{addr}");
    info!("API endpoints:");
    info!("  GET /health");
    info!("  GET /api/stops/near?lat=&lon=&distance=");
    info!("  GET /api/stops/search?q=&lat=&lon=&distance=&route=&limit=");
    info!("  GET /api/stops/{{key}}");
    info!("  GET /api/stops/{{key}}/schedule");
    info!("  GET /api/trips?origin=&destination=");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
