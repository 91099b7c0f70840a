use cms_handlers_lambda::adapters::page_store::DynamoDbPageStore;
use cms_handlers_lambda::handlers::list_content::handle_list_event;
use cms_handlers_lambda::response::ApiGatewayResponse;
use cms_handlers_lambda::runtime::contract::{ScanFilter, ScanSpec};
use cms_handlers_lambda::runtime::ordering::ContentOrdering;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

const PRIMARY_SORT_FIELD: &str = "published_at";
const SECONDARY_SORT_FIELD: &str = "created_at";

async fn handle_request(event: LambdaEvent<Value>) -> Result<ApiGatewayResponse, Error> {
    let table = std::env::var("CONTENT_TABLE")
        .map_err(|_| Error::from("CONTENT_TABLE must be configured"))?;
    let status_filter = std::env::var("CONTENT_STATUS_FILTER").ok();
    let page_limit = match std::env::var("CONTENT_PAGE_LIMIT") {
        Ok(raw) => Some(
            raw.parse::<i32>()
                .map_err(|error| Error::from(format!("invalid CONTENT_PAGE_LIMIT: {error}")))?,
        ),
        Err(_) => None,
    };
    let projection = std::env::var("CONTENT_PROJECTION")
        .map(|raw| {
            raw.split(',')
                .map(|field| field.trim().to_string())
                .filter(|field| !field.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let spec = ScanSpec {
        filter: status_filter.map(|status| ScanFilter {
            field: "status".to_string(),
            equals: Value::from(status),
        }),
        projection,
        page_limit,
    };
    let ordering = ContentOrdering::new(PRIMARY_SORT_FIELD, SECONDARY_SORT_FIELD);

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let page_store = DynamoDbPageStore {
        table,
        ddb_client: aws_sdk_dynamodb::Client::new(&aws_config),
    };

    Ok(handle_list_event(event.payload, &spec, &ordering, &page_store))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
