use std::net::SocketAddr;
use std::sync::Arc;

use newriver_service::config::AppConfig;
use newriver_service::logging::{self, LogLevel, LogSource};
use newriver_service::server;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let log_file = std::env::var("LOG_FILE").ok();
    logging::init_logger(LogLevel::Info, log_file.as_deref());

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            logging::error(LogSource::System, None, &e);
            std::process::exit(1);
        }
    };

    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            logging::error(
                LogSource::System,
                None,
                &format!("invalid bind address {}:{}: {}", config.host, config.port, e),
            );
            std::process::exit(1);
        }
    };

    logging::info(
        LogSource::System,
        None,
        &format!("serving gauge page on http://{} for sites {:?}", addr, config.site_codes),
    );

    let app = server::router(Arc::new(config));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listen address");
    axum::serve(listener, app).await.expect("server error");
}
