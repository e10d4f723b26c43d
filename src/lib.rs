pub mod api;
pub mod auth;
pub mod board;
pub mod config;
pub mod dashboard;
pub mod guard;
pub mod session;

use std::sync::Arc;

use anyhow::Result;

use api::ApiClient;
use config::ClientConfig;
use session::SessionStore;

/// Shared application state passed to every screen handler.
///
/// The session store is an explicit, injectable service here — screens
/// receive it through the context instead of reaching into ambient global
/// state, which is what the browser incarnation of this client did.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ClientConfig>,
    pub session: Arc<SessionStore>,
    pub api: Arc<ApiClient>,
}

impl AppContext {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let session = SessionStore::new(&config.data_dir);
        let api = ApiClient::new(&config.api_base_url)?;
        Ok(Self {
            config: Arc::new(config),
            session: Arc::new(session),
            api: Arc::new(api),
        })
    }
}
