use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use virtual_stylist::{
    api,
    config,
    encoder::PreviewRegistry,
    GeminiClient,
    Stylist,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    config::Config::dotenv_load();
    let config = match config::Config::new() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    config::Config::print_env_vars();

    let client = GeminiClient::from_config(&config);
    let stylist = Stylist::new(Arc::new(client), PreviewRegistry::new());
    let state = Arc::new(api::AppState { stylist: Arc::new(stylist) });
    let app = api::router(state, config.max_upload_bytes);

    // Run our application with safe parsing
    let host_str = config.api_host.clone();
    let port_str = config.api_port.clone();
    let ip: std::net::IpAddr = host_str.parse().unwrap_or_else(|_| {
        tracing::warn!("Invalid API_HOST '{}', falling back to 127.0.0.1", host_str);
        std::net::IpAddr::from([127, 0, 0, 1])
    });
    let port: u16 = port_str.parse().unwrap_or_else(|_| {
        tracing::warn!("Invalid API_PORT '{}', falling back to 8190", port_str);
        8190
    });
    let socket_address = SocketAddr::new(ip, port);
    tracing::info!("listening on {}", socket_address);
    if let Err(e) = axum::Server::bind(&socket_address)
        .serve(app.into_make_service())
        .await
    {
        tracing::error!("server error: {}", e);
        std::process::exit(1);
    }
}
