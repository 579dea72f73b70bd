use async_trait::async_trait;

use crate::domain::events::event::{KitchenWorkerRequest, RequestStatusChange, ShelfEvent};

#[async_trait]
pub trait ShelfEventPublisher: Send + Sync {
    async fn publish_shelf_event(&self, event: &ShelfEvent) -> anyhow::Result<()>;
}

#[async_trait]
pub trait RequestStatusPublisher: Send + Sync {
    async fn publish_status_change(&self, change: &RequestStatusChange) -> anyhow::Result<()>;
}

#[async_trait]
pub trait KitchenRequestPublisher: Send + Sync {
    async fn request_items(&self, request: &KitchenWorkerRequest) -> anyhow::Result<()>;
}
