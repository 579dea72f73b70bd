use anyhow::Context;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::config::ClientConfig;
use rdkafka::types::RDKafkaErrorCode;

use crate::bootstrap::config::KafkaConfig;

/// Creates the service topics that do not exist yet.
pub async fn ensure_topics(cfg: &KafkaConfig) -> anyhow::Result<()> {
    let admin: AdminClient<DefaultClientContext> = ClientConfig::new()
        .set("bootstrap.servers", &cfg.bootstrap_servers)
        .create()
        .context("creating kafka admin client")?;

    let topics: Vec<NewTopic<'_>> = [&cfg.shelf_topic, &cfg.kitchen_topic, &cfg.request_status_topic]
        .into_iter()
        .map(|t| {
            NewTopic::new(
                &t.name,
                t.partitions,
                TopicReplication::Fixed(cfg.replication_factor),
            )
        })
        .collect();
    let results = admin
        .create_topics(topics.iter(), &AdminOptions::new())
        .await
        .context("creating kafka topics")?;

    for result in results {
        match result {
            Ok(name) => tracing::info!(topic = %name, "kafka_topic_created"),
            Err((name, RDKafkaErrorCode::TopicAlreadyExists)) => {
                tracing::debug!(topic = %name, "kafka_topic_exists")
            }
            Err((name, code)) => anyhow::bail!("creating topic {name} failed: {code}"),
        }
    }
    Ok(())
}
