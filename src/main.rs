use ledgerdraw::{StoreConfig, StoreError, StoreState};

#[tokio::main]
async fn main() -> Result<(), StoreError> {
    tracing_subscriber::fmt::init();

    let config = StoreConfig::from_env()?;
    let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;

    tracing::info!(addr = %config.socket_addr(), "ledgerdraw store listening");
    ledgerdraw::serve(listener, StoreState::new()).await
}
