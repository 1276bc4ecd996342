use std::time::Duration;

use itertools::Itertools;
use log::{debug, info};
use mongodb::{bson::doc, options::ClientOptions, Client};

pub const DEFAULT_DATABASE_ENV_VAR: &str = "MONGODB_URL";

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Environment variable {0} is not set")]
    MissingUrl(String),
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}

/// Something that can be asked to establish the database connection.
///
/// The updaters only attempt a connection; reading and writing goes through
/// [`crate::schedule::store::ScheduleStore`].
#[allow(async_fn_in_trait)]
pub trait Connector {
    async fn connect(&self) -> Result<(), DatabaseError>;
}

/// Reads the connection string from the environment (after loading `.env`)
/// on every attempt, then pings the deployment it names.
#[derive(Clone, Debug)]
pub struct EnvConnector {
    var: String,
    timeout: Duration,
}
impl EnvConnector {
    pub fn new(var: impl Into<String>, timeout: Duration) -> Self {
        Self {
            var: var.into(),
            timeout,
        }
    }

    fn uri(&self) -> Result<String, DatabaseError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {e}");
        }
        std::env::var(&self.var).map_err(|_| DatabaseError::MissingUrl(self.var.clone()))
    }
}
impl Connector for EnvConnector {
    async fn connect(&self) -> Result<(), DatabaseError> {
        ping(&self.uri()?, self.timeout).await
    }
}

/// Connects with the official driver and runs `ping` against `admin`.
///
/// `mongodb+srv` strings are resolved through DNS by the driver.  `timeout`
/// bounds both server selection and each socket connect.
pub async fn ping(uri: &str, timeout: Duration) -> Result<(), DatabaseError> {
    let mut options = ClientOptions::parse(uri).await?;
    options.server_selection_timeout = Some(timeout);
    options.connect_timeout = Some(timeout);
    let hosts = options.hosts.iter().join(",");
    let client = Client::with_options(options)?;
    let pinged = client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await;
    client.shutdown().await;
    pinged?;
    info!("Connected to the database at {hosts}");
    Ok(())
}
