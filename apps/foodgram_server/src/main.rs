// apps/foodgram_server/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use foodgram_server::config::{AppConfig, LogFormat};
use foodgram_server::web::configure_app_routes;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.as_str()));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter) // RUST_LOG overrides the INFO default
    .with_span_events(FmtSpan::CLOSE);
  match format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Pretty => builder.init(),
  }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  dotenvy::dotenv().ok();
  let log_format = LogFormat::from_env().unwrap_or(LogFormat::Pretty);
  init_tracing(log_format);

  tracing::info!("Starting Foodgram server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };
  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);

  let app_state = match foodgram_server::build_state(app_config).await {
    Ok(state) => state,
    Err(e) => {
      tracing::error!(error = ?e, "Failed to initialize storage.");
      return Err(std::io::Error::other(format!("{:#}", e)));
    }
  };

  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
