use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use serde::Serialize;

use crate::application::ports::event_publisher::{
    KitchenRequestPublisher, RequestStatusPublisher, ShelfEventPublisher,
};
use crate::bootstrap::config::KafkaConfig;
use crate::domain::events::event::{KitchenWorkerRequest, RequestStatusChange, ShelfEvent};

const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Publishes the service's JSON messages to their Kafka topics.
#[derive(Clone)]
pub struct KafkaEventPublisher {
    producer: FutureProducer,
    shelf_topic: String,
    kitchen_topic: String,
    request_status_topic: String,
}

impl KafkaEventPublisher {
    pub fn new(cfg: &KafkaConfig) -> anyhow::Result<Self> {
        tracing::info!(brokers = %cfg.bootstrap_servers, "kafka_producer_starting");
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &cfg.bootstrap_servers)
            .set("message.timeout.ms", "5000")
            .create()
            .context("creating kafka producer")?;
        Ok(Self {
            producer,
            shelf_topic: cfg.shelf_topic.name.clone(),
            kitchen_topic: cfg.kitchen_topic.name.clone(),
            request_status_topic: cfg.request_status_topic.name.clone(),
        })
    }

    async fn send<T: Serialize + Sync>(
        &self,
        topic: &str,
        key: i32,
        payload: &T,
    ) -> anyhow::Result<()> {
        let body = encode_payload(payload)?;
        let key = key.to_string();
        let (partition, offset) = self
            .producer
            .send(
                FutureRecord::to(topic).key(&key).payload(&body),
                SEND_TIMEOUT,
            )
            .await
            .map_err(|(err, _)| anyhow::Error::new(err))
            .with_context(|| format!("sending message to {topic}"))?;
        tracing::debug!(topic, key = %key, partition, offset, "kafka_message_sent");
        Ok(())
    }
}

pub fn encode_payload<T: Serialize + ?Sized>(payload: &T) -> anyhow::Result<Vec<u8>> {
    Ok(serde_json::to_vec(payload)?)
}

#[async_trait]
impl ShelfEventPublisher for KafkaEventPublisher {
    async fn publish_shelf_event(&self, event: &ShelfEvent) -> anyhow::Result<()> {
        let key = event
            .request_id
            .filter(|id| *id > 0)
            .unwrap_or(event.menu_item_id);
        self.send(&self.shelf_topic, key, event).await
    }
}

#[async_trait]
impl RequestStatusPublisher for KafkaEventPublisher {
    async fn publish_status_change(&self, change: &RequestStatusChange) -> anyhow::Result<()> {
        self.send(&self.request_status_topic, change.request_id, change)
            .await
    }
}

#[async_trait]
impl KitchenRequestPublisher for KafkaEventPublisher {
    async fn request_items(&self, request: &KitchenWorkerRequest) -> anyhow::Result<()> {
        self.send(&self.kitchen_topic, request.menu_item_id, request)
            .await
    }
}
