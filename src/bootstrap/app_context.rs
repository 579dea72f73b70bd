use std::sync::Arc;

use futures_util::{StreamExt, stream::BoxStream};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::application::dto::requests::RequestStatusDto;
use crate::application::ports::clock::Clock;
use crate::application::ports::event_publisher::{
    KitchenRequestPublisher, RequestStatusPublisher, ShelfEventPublisher,
};
use crate::application::ports::menu_item_repository::MenuItemRepository;
use crate::application::ports::request_repository::RequestRepository;
use crate::application::ports::shelf_repository::ShelfRepository;
use crate::application::ports::status_notifier::StatusNotifier;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    request_repo: Arc<dyn RequestRepository>,
    menu_repo: Arc<dyn MenuItemRepository>,
    shelf_repo: Arc<dyn ShelfRepository>,
    shelf_events: Arc<dyn ShelfEventPublisher>,
    status_events: Arc<dyn RequestStatusPublisher>,
    kitchen_requests: Arc<dyn KitchenRequestPublisher>,
    status_notifications: broadcast::Sender<RequestStatusDto>,
    status_notifier: Arc<dyn StatusNotifier>,
    clock: Arc<dyn Clock>,
}

impl AppServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        request_repo: Arc<dyn RequestRepository>,
        menu_repo: Arc<dyn MenuItemRepository>,
        shelf_repo: Arc<dyn ShelfRepository>,
        shelf_events: Arc<dyn ShelfEventPublisher>,
        status_events: Arc<dyn RequestStatusPublisher>,
        kitchen_requests: Arc<dyn KitchenRequestPublisher>,
        status_notifications: broadcast::Sender<RequestStatusDto>,
        status_notifier: Arc<dyn StatusNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            request_repo,
            menu_repo,
            shelf_repo,
            shelf_events,
            status_events,
            kitchen_requests,
            status_notifications,
            status_notifier,
            clock,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn request_repo(&self) -> Arc<dyn RequestRepository> {
        self.services.request_repo.clone()
    }

    pub fn menu_repo(&self) -> Arc<dyn MenuItemRepository> {
        self.services.menu_repo.clone()
    }

    pub fn shelf_repo(&self) -> Arc<dyn ShelfRepository> {
        self.services.shelf_repo.clone()
    }

    pub fn shelf_events(&self) -> Arc<dyn ShelfEventPublisher> {
        self.services.shelf_events.clone()
    }

    pub fn status_events(&self) -> Arc<dyn RequestStatusPublisher> {
        self.services.status_events.clone()
    }

    pub fn kitchen_requests(&self) -> Arc<dyn KitchenRequestPublisher> {
        self.services.kitchen_requests.clone()
    }

    pub fn status_notifier(&self) -> Arc<dyn StatusNotifier> {
        self.services.status_notifier.clone()
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.services.clock.clone()
    }

    /// Status notifications published from now on. Subscribers that fall
    /// behind the buffer skip the notifications they missed.
    pub fn subscribe_status_notifications(&self) -> BoxStream<'static, RequestStatusDto> {
        BroadcastStream::new(self.services.status_notifications.subscribe())
            .filter_map(|evt| async move {
                match evt {
                    Ok(n) => Some(n),
                    Err(err) => {
                        tracing::warn!(error = %err, "status_subscriber_lagged");
                        None
                    }
                }
            })
            .boxed()
    }
}
