use crate::{auth::Authenticator, config::Config};
use database::{
    clock::{Clock, SystemClock},
    db::create_connection,
    store::{MemoryStore, SeaOrmStore, Store},
};
use log::info;
use migration::{Migrator, MigratorTrait};
use sea_orm::DbErr;
use std::sync::Arc;

/// Shared handles every handler receives
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub clock: Arc<dyn Clock>,
    pub auth: Arc<Authenticator>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, auth: Authenticator) -> Self {
        Self {
            store,
            clock,
            auth: Arc::new(auth),
        }
    }

    /// Connects the configured store, running migrations first if asked to
    pub async fn from_config(config: &Config) -> Result<Self, DbErr> {
        let store: Arc<dyn Store> = match &config.database_url {
            Some(url) => {
                let db = create_connection(url).await?;

                if config.run_migrations {
                    info!("Running database migrations");
                    Migrator::up(&db, None).await?;
                }

                Arc::new(SeaOrmStore::new(db))
            }
            None => Arc::new(MemoryStore::new()),
        };

        Ok(Self::new(
            store,
            Arc::new(SystemClock),
            Authenticator::new(&config.jwt_secret, config.token_ttl_secs),
        ))
    }
}
