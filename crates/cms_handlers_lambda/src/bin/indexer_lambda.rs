use cms_handlers_lambda::adapters::queue::SqsQueueAck;
use cms_handlers_lambda::adapters::search::HttpSearchIndex;
use cms_handlers_lambda::handlers::drain::{drain_batch, queue_messages_from_sqs_event};
use cms_handlers_lambda::handlers::indexer::IndexContentAction;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::{json, Value};

async fn handle_request(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let queue_url =
        std::env::var("QUEUE_URL").map_err(|_| Error::from("QUEUE_URL must be configured"))?;
    let endpoint = std::env::var("SEARCH_ENDPOINT")
        .map_err(|_| Error::from("SEARCH_ENDPOINT must be configured"))?;
    let api_key = std::env::var("SEARCH_API_KEY")
        .map_err(|_| Error::from("SEARCH_API_KEY must be configured"))?;

    let batch = queue_messages_from_sqs_event(&event.payload).map_err(Error::from)?;

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let queue = SqsQueueAck {
        queue_url,
        sqs_client: aws_sdk_sqs::Client::new(&aws_config),
    };
    let search_index = HttpSearchIndex {
        endpoint,
        api_key,
        http_client: reqwest::Client::new(),
    };
    let action = IndexContentAction {
        index: &search_index,
    };

    let results = drain_batch(&batch, &action, &queue);
    let succeeded = results.iter().filter(|result| result.succeeded).count();

    Ok(json!({
        "batch_size": results.len(),
        "succeeded": succeeded,
        "failed": results.len() - succeeded,
    }))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
