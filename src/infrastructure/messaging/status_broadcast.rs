use async_trait::async_trait;

use crate::application::dto::requests::RequestStatusDto;
use crate::application::ports::status_notifier::StatusNotifier;

#[derive(Clone)]
pub struct BroadcastStatusNotifier {
    sender: tokio::sync::broadcast::Sender<RequestStatusDto>,
}

impl BroadcastStatusNotifier {
    pub fn new(sender: tokio::sync::broadcast::Sender<RequestStatusDto>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl StatusNotifier for BroadcastStatusNotifier {
    async fn notify(&self, notification: &RequestStatusDto) -> anyhow::Result<()> {
        match self.sender.send(*notification) {
            Ok(_) => Ok(()),
            // nobody is watching right now
            Err(tokio::sync::broadcast::error::SendError(_)) => Ok(()),
        }
    }
}
