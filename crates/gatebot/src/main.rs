use std::sync::Arc;

use tracing::{error, info};

use gatebot_core::{config::Config, errors::PlatformError, store::Datastore, Error};
use gatebot_mongo::MongoDatastore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    gatebot_core::logging::init("gatebot")?;

    let cfg = Arc::new(Config::load().map_err(|e| {
        error!(error = %e, "refusing to start");
        Error::from(e)
    })?);

    let datastore: Arc<dyn Datastore> =
        Arc::new(MongoDatastore::open(&cfg.datastore_uri, &cfg.datastore_db).await?);

    gatebot_telegram::router::run_polling(cfg, datastore)
        .await
        .map_err(|e| match e.downcast_ref::<PlatformError>() {
            Some(p) => Error::Platform(p.clone()),
            None => Error::External(format!("telegram bot failed: {e:#}")),
        })?;

    info!("clean shutdown");
    Ok(())
}
