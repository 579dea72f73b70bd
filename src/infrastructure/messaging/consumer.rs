use anyhow::Context;
use async_trait::async_trait;
use rdkafka::Message;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use serde::de::DeserializeOwned;
use tokio::sync::watch;

/// Receives the decoded messages of one topic.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    type Message: DeserializeOwned + Send;

    async fn handle(&self, message: Self::Message);
}

/// Where newly created consumer groups start reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartFrom {
    Earliest,
    Latest,
}

impl StartFrom {
    fn as_str(self) -> &'static str {
        match self {
            StartFrom::Earliest => "earliest",
            StartFrom::Latest => "latest",
        }
    }
}

pub fn create_consumer(
    brokers: &str,
    group: &str,
    topic: &str,
    start: StartFrom,
) -> anyhow::Result<StreamConsumer> {
    tracing::info!(brokers, group, topic, "kafka_consumer_starting");
    let consumer: StreamConsumer = ClientConfig::new()
        .set("bootstrap.servers", brokers)
        .set("group.id", group)
        .set("enable.partition.eof", "false")
        .set("session.timeout.ms", "6000")
        .set("enable.auto.commit", "true")
        .set("auto.offset.reset", start.as_str())
        .create()
        .context("creating kafka consumer")?;
    consumer
        .subscribe(&[topic])
        .with_context(|| format!("subscribing to {topic}"))?;
    Ok(consumer)
}

pub fn decode_payload<T: DeserializeOwned>(payload: Option<&[u8]>) -> anyhow::Result<T> {
    let bytes = payload.context("message has no payload")?;
    serde_json::from_slice(bytes).context("message payload is not valid json for its topic")
}

/// Feeds every message of `consumer` to `handler` until `shutdown` flips.
/// Messages that cannot be decoded are logged and skipped.
pub async fn run_consumer<H: MessageHandler>(
    consumer: StreamConsumer,
    handler: H,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        // the borrowed message must not live across the handler await
        let decoded = {
            let received = tokio::select! {
                _ = shutdown.changed() => break,
                received = consumer.recv() => received,
            };
            match received {
                Ok(msg) => decode_payload::<H::Message>(msg.payload()).with_context(|| {
                    format!(
                        "topic {} partition {} offset {}",
                        msg.topic(),
                        msg.partition(),
                        msg.offset()
                    )
                }),
                Err(err) => {
                    tracing::warn!(error = ?err, "kafka_receive_failed");
                    continue;
                }
            }
        };
        match decoded {
            Ok(message) => handler.handle(message).await,
            Err(err) => tracing::warn!(error = ?err, "kafka_message_skipped"),
        }
    }
    tracing::info!("kafka_consumer_stopped");
}
