use aws_config::SdkConfig;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_sns::Client as SnsClient;

/// A type used to hold the AWS clients required to interact with AWS services
/// used by the lambda function.
#[derive(Clone, Debug)]
pub struct AwsClients {
    pub dynamodb: DynamoDbClient,
    pub sns: SnsClient,
    pub s3: S3Client,
}

impl AwsClients {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        AwsClients {
            dynamodb: DynamoDbClient::new(sdk_config),
            sns: SnsClient::new(sdk_config),
            s3: S3Client::new(sdk_config),
        }
    }
}
