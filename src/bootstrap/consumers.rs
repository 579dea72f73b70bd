use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::application::use_cases::packing::handle_shelf_event::HandleShelfEvent;
use crate::application::use_cases::packing::pack_request::PackRequest;
use crate::application::use_cases::requests::watch_status::WatchRequestStatus;
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::KafkaConfig;
use crate::domain::events::event::{RequestStatusChange, ShelfEvent};
use crate::infrastructure::messaging::consumer::{
    MessageHandler, StartFrom, create_consumer, run_consumer,
};

/// Packs requests and restocks the shelf as shelf events arrive.
pub struct ShelfEventHandler {
    pub ctx: AppContext,
}

#[async_trait]
impl MessageHandler for ShelfEventHandler {
    type Message = ShelfEvent;

    async fn handle(&self, event: ShelfEvent) {
        let requests = self.ctx.request_repo();
        let menu = self.ctx.menu_repo();
        let shelf = self.ctx.shelf_repo();
        let kitchen = self.ctx.kitchen_requests();
        let status_events = self.ctx.status_events();
        let clock = self.ctx.clock();
        let uc = HandleShelfEvent {
            pack: PackRequest {
                requests: requests.as_ref(),
                menu: menu.as_ref(),
                shelf: shelf.as_ref(),
                kitchen: kitchen.as_ref(),
                status_events: status_events.as_ref(),
                clock: clock.as_ref(),
                take_attempts: self.ctx.cfg.shelf_take_attempts,
            },
        };
        match uc.execute(&event).await {
            Ok(Some(packed)) => tracing::debug!(
                request_id = packed.request_id,
                collected = packed.collected_items,
                total = packed.total_items,
                "shelf_event_packed_request"
            ),
            Ok(None) => tracing::debug!(
                menu_item_id = event.menu_item_id,
                quantity = event.quantity,
                "shelf_event_restocked"
            ),
            Err(err) => tracing::error!(
                event_type = ?event.event_type,
                request_id = ?event.request_id,
                error = ?err,
                "shelf_event_failed"
            ),
        }
    }
}

/// Forwards status changes from the bus to subscribed HTTP clients.
pub struct StatusChangeHandler {
    pub ctx: AppContext,
}

#[async_trait]
impl MessageHandler for StatusChangeHandler {
    type Message = RequestStatusChange;

    async fn handle(&self, change: RequestStatusChange) {
        let requests = self.ctx.request_repo();
        let menu = self.ctx.menu_repo();
        let notifier = self.ctx.status_notifier();
        let uc = WatchRequestStatus {
            requests: requests.as_ref(),
            menu: menu.as_ref(),
            notifier: notifier.as_ref(),
        };
        if let Err(err) = uc.execute(&change).await {
            tracing::error!(request_id = change.request_id, error = ?err, "status_change_failed");
        }
    }
}

/// Starts the shelf and request-status listeners. Both stop once `shutdown`
/// changes.
pub fn spawn_consumers(
    ctx: &AppContext,
    shutdown: watch::Receiver<bool>,
) -> anyhow::Result<Vec<JoinHandle<()>>> {
    let kafka = &ctx.cfg.kafka;
    let shelf = create_consumer(
        &kafka.bootstrap_servers,
        &kafka.consumer_group,
        &kafka.shelf_topic.name,
        StartFrom::Earliest,
    )?;
    let status = create_consumer(
        &kafka.bootstrap_servers,
        KafkaConfig::REQUEST_STATUS_GROUP,
        &kafka.request_status_topic.name,
        StartFrom::Latest,
    )?;
    Ok(vec![
        tokio::spawn(run_consumer(
            shelf,
            ShelfEventHandler { ctx: ctx.clone() },
            shutdown.clone(),
        )),
        tokio::spawn(run_consumer(
            status,
            StatusChangeHandler { ctx: ctx.clone() },
            shutdown,
        )),
    ])
}
