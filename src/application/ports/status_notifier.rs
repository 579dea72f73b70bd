use async_trait::async_trait;

use crate::application::dto::requests::RequestStatusDto;

/// Pushes status notifications to the clients watching requests.
#[async_trait]
pub trait StatusNotifier: Send + Sync {
    async fn notify(&self, notification: &RequestStatusDto) -> anyhow::Result<()>;
}
