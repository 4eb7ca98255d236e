use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use powcollective::api::ApiState;
use powcollective::{
    AppConfig, ConditionsService, ForecastCache, OpenMeteoClient, ResortDirectory, web,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    tracing::debug!("starting with {:?}", config);

    let directory = Arc::new(ResortDirectory::bundled());
    let client = Arc::new(OpenMeteoClient::new(&config.forecast)?);
    let cache = Arc::new(ForecastCache::new(
        client,
        config.cache_ttl,
        config.cache_capacity,
    ));
    let conditions = Arc::new(ConditionsService::new(directory.clone(), cache));

    web::run(config.port, ApiState {
        directory,
        conditions,
    })
    .await
}
