use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use landmark_server::cache::CachedRouteFetcher;
use landmark_server::catalog::LandmarkCatalog;
use landmark_server::config::ServerConfig;
use landmark_server::directions::{DirectionsClient, RouteFetcher, StraightLineRoutes};
use landmark_server::route::RouteCoordinator;
use landmark_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;

    let catalog = LandmarkCatalog::load(&config.data_path)?;

    // Route lookups: Mapbox when a token is configured, offline estimates otherwise
    let fetcher: Arc<dyn RouteFetcher> = match config.directions.clone() {
        Some(directions) => {
            info!(profile = %directions.profile, "using Mapbox directions");
            let client = DirectionsClient::new(directions)?;
            Arc::new(CachedRouteFetcher::new(client, &config.cache))
        }
        None => {
            warn!("MAPBOX_ACCESS_TOKEN not set, using straight-line route estimates");
            Arc::new(StraightLineRoutes::new())
        }
    };

    let routes = RouteCoordinator::new(fetcher, config.origin);
    let state = AppState::new(catalog, routes);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("Landmark server listening on http://{}", config.bind);
    info!("  GET  /health                - Health check");
    info!("  GET  /landmarks?q=          - Search landmarks");
    info!("  GET  /landmarks/categories  - Landmarks by category");
    info!("  GET  /landmarks/:id         - Landmark details");
    info!("  POST /landmarks/:id/route   - Route to a landmark");
    info!("  GET  /route                 - Current route");
    info!("  POST /route/reload          - Retry the current route");
    info!("  PUT  /location              - Update device location");

    axum::serve(listener, app).await?;

    Ok(())
}
