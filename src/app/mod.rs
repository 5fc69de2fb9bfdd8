use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{
    config::{AppConfig, ProviderConfig},
    mailerlite::{MailerLiteClient, SubscriberRegistry},
    Result,
};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener) -> Self {
        App {
            app_state,
            listener,
        }
    }

    pub async fn build_from_config(config: AppConfig) -> Result<Self> {
        let subscriber_registry = MailerLiteClient::new(&config.provider_config.url)?;

        // Not fatal, every subscribe request answers with a 500 until it gets fixed.
        if let Err(er) = config.provider_config.credentials() {
            warn!("{:<20} - {er}", "Provider config:");
        }

        let app_state = AppState::new(config.provider_config, Arc::new(subscriber_registry));

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        let app = App::new(app_state, listener);
        Ok(app)
    }
}

pub struct InternalState {
    pub provider_config: ProviderConfig,
    pub subscriber_registry: Arc<dyn SubscriberRegistry>,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(
        provider_config: ProviderConfig,
        subscriber_registry: Arc<dyn SubscriberRegistry>,
    ) -> Self {
        AppState(Arc::new(InternalState {
            provider_config,
            subscriber_registry,
        }))
    }
}
