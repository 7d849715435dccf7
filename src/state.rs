use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, SeaOrmAuthService, SeaOrmUserService, TokenService, UserService,
};

#[derive(Clone)]
pub struct SharedState {
    /// Loaded once at startup; nothing mutates it afterwards.
    pub config: Config,

    pub store: Store,

    pub user_service: Arc<dyn UserService>,

    pub auth_service: Arc<dyn AuthService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let user_service = Arc::new(SeaOrmUserService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn UserService + Send + Sync + 'static>;

        let tokens = TokenService::new(&config.auth);
        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone(), tokens))
            as Arc<dyn AuthService + Send + Sync + 'static>;

        Ok(Self {
            config,
            store,
            user_service,
            auth_service,
        })
    }
}
