use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_sns::Client as SnsClient;
use aws_smithy_types::body::SdkBody;
use aws_smithy_types::byte_stream::ByteStream;
use lambda_runtime::Error;
use tracing::debug;

use crate::alert::AlertMessage;
use crate::chart::DynChartRenderer;
use crate::clients::AwsClients;
use crate::reading::StoredRecord;

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn put_record(&self, table: &str, record: &StoredRecord) -> Result<(), Error>;
}

#[async_trait]
pub trait AlertPublisher: Send + Sync {
    async fn publish_alert(&self, topic_arn: &str, alert: &AlertMessage) -> Result<(), Error>;
}

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn put_artifact(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<(), Error>;
}

#[async_trait]
impl RecordStore for DynamoDbClient {
    async fn put_record(&self, table: &str, record: &StoredRecord) -> Result<(), Error> {
        debug!("putting record into {}: {:?}", table, record);
        self.put_item()
            .table_name(table)
            .set_item(Some(record.to_item()))
            .send()
            .await
            .map_err(|e| format!("failed writing record to table {} - {}", table, e))?;
        Ok(())
    }
}

#[async_trait]
impl AlertPublisher for SnsClient {
    async fn publish_alert(&self, topic_arn: &str, alert: &AlertMessage) -> Result<(), Error> {
        let output = self
            .publish()
            .topic_arn(topic_arn)
            .subject(alert.subject)
            .message(&alert.body)
            .send()
            .await
            .map_err(|e| format!("failed publishing alert to {} - {}", topic_arn, e))?;
        debug!("published alert, message id {:?}", output.message_id());
        Ok(())
    }
}

#[async_trait]
impl ArtifactStore for S3Client {
    async fn put_artifact(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<(), Error> {
        debug!("uploading {} bytes to s3://{}/{}", body.len(), bucket, key);
        let buffer = ByteStream::new(SdkBody::from(body));
        self.put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(buffer)
            .send()
            .await
            .map_err(|e| format!("failed uploading file to bucket - {}", e))?;
        Ok(())
    }
}

/// Everything the handler talks to. Built once at cold start and shared by
/// every invocation.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn RecordStore>,
    pub publisher: Arc<dyn AlertPublisher>,
    pub artifacts: Arc<dyn ArtifactStore>,
    pub renderer: DynChartRenderer,
}

impl Services {
    pub fn new(clients: &AwsClients, renderer: DynChartRenderer) -> Self {
        Services {
            store: Arc::new(clients.dynamodb.clone()),
            publisher: Arc::new(clients.sns.clone()),
            artifacts: Arc::new(clients.s3.clone()),
            renderer,
        }
    }
}
