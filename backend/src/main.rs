use std::io;

use backend::server::{create_server, AppConfig};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = AppConfig::from_env().map_err(io::Error::other)?;
    create_server(config)?.await
}
