use std::collections::{BTreeMap, HashMap};

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::Value;

use crate::runtime::contract::{Record, ScanPage, ScanSpec};

/// Backing-store scan capability. One call returns one page; the store may
/// return fewer records than `page_limit` and an opaque continuation token.
pub trait PageStore {
    fn scan_page(&self, spec: &ScanSpec, start_token: Option<&str>) -> Result<ScanPage, String>;
}

pub struct DynamoDbPageStore {
    pub table: String,
    pub ddb_client: aws_sdk_dynamodb::Client,
}

impl PageStore for DynamoDbPageStore {
    fn scan_page(&self, spec: &ScanSpec, start_token: Option<&str>) -> Result<ScanPage, String> {
        let table = self.table.clone();
        let client = self.ddb_client.clone();
        let start_key = start_token.map(decode_continuation_token).transpose()?;
        let expression = build_scan_expression(spec)?;

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = client
                    .scan()
                    .table_name(table)
                    .set_limit(spec.page_limit)
                    .set_exclusive_start_key(start_key)
                    .set_filter_expression(expression.filter)
                    .set_projection_expression(expression.projection)
                    .set_expression_attribute_names(expression.names)
                    .set_expression_attribute_values(expression.values)
                    .send()
                    .await
                    .map_err(|error| format!("failed to scan table page: {error}"))?;

                let records = output
                    .items()
                    .iter()
                    .map(record_from_item)
                    .collect::<Vec<Record>>();
                let next_token = output
                    .last_evaluated_key()
                    .map(encode_continuation_token)
                    .transpose()?;

                Ok(ScanPage {
                    records,
                    next_token,
                })
            })
        })
    }
}

struct ScanExpression {
    filter: Option<String>,
    projection: Option<String>,
    names: Option<HashMap<String, String>>,
    values: Option<HashMap<String, AttributeValue>>,
}

/// Every field name goes through an expression-attribute alias so reserved
/// words like `status` or `name` stay usable as record fields.
fn build_scan_expression(spec: &ScanSpec) -> Result<ScanExpression, String> {
    let mut names = HashMap::new();
    let mut values = HashMap::new();

    let filter = match &spec.filter {
        Some(filter) => {
            names.insert("#filter_field".to_string(), filter.field.clone());
            values.insert(
                ":filter_value".to_string(),
                json_to_attribute(&filter.equals)?,
            );
            Some("#filter_field = :filter_value".to_string())
        }
        None => None,
    };

    let projection = if spec.projection.is_empty() {
        None
    } else {
        let mut aliases = Vec::with_capacity(spec.projection.len());
        for (position, field) in spec.projection.iter().enumerate() {
            let alias = format!("#proj_{position}");
            names.insert(alias.clone(), field.clone());
            aliases.push(alias);
        }
        Some(aliases.join(", "))
    };

    Ok(ScanExpression {
        filter,
        projection,
        names: (!names.is_empty()).then_some(names),
        values: (!values.is_empty()).then_some(values),
    })
}

/// The continuation token is a JSON object of the table's key attributes.
/// Only string-typed key attributes are supported, which holds for every CMS
/// table (content ids are guid strings).
fn encode_continuation_token(key: &HashMap<String, AttributeValue>) -> Result<String, String> {
    let mut flattened = BTreeMap::new();
    for (name, value) in key {
        let raw = value
            .as_s()
            .map_err(|_| format!("unsupported non-string key attribute '{name}'"))?;
        flattened.insert(name.clone(), raw.clone());
    }
    serde_json::to_string(&flattened)
        .map_err(|error| format!("failed to encode continuation token: {error}"))
}

fn decode_continuation_token(token: &str) -> Result<HashMap<String, AttributeValue>, String> {
    let flattened: BTreeMap<String, String> = serde_json::from_str(token)
        .map_err(|error| format!("invalid continuation token: {error}"))?;
    Ok(flattened
        .into_iter()
        .map(|(name, raw)| (name, AttributeValue::S(raw)))
        .collect())
}

fn record_from_item(item: &HashMap<String, AttributeValue>) -> Record {
    item.iter()
        .map(|(name, value)| (name.clone(), attribute_to_json(value)))
        .collect()
}

fn attribute_to_json(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::S(raw) => Value::String(raw.clone()),
        AttributeValue::N(raw) => number_to_json(raw),
        AttributeValue::Bool(flag) => Value::Bool(*flag),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(items) => Value::Array(items.iter().map(attribute_to_json).collect()),
        AttributeValue::M(entries) => Value::Object(
            entries
                .iter()
                .map(|(name, nested)| (name.clone(), attribute_to_json(nested)))
                .collect(),
        ),
        AttributeValue::Ss(items) => {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Ns(items) => Value::Array(items.iter().map(|raw| number_to_json(raw)).collect()),
        _ => Value::Null,
    }
}

fn number_to_json(raw: &str) -> Value {
    if let Ok(integer) = raw.parse::<i64>() {
        return Value::from(integer);
    }
    if let Ok(float) = raw.parse::<f64>() {
        return Value::from(float);
    }
    Value::String(raw.to_string())
}

fn json_to_attribute(value: &Value) -> Result<AttributeValue, String> {
    match value {
        Value::String(raw) => Ok(AttributeValue::S(raw.clone())),
        Value::Number(number) => Ok(AttributeValue::N(number.to_string())),
        Value::Bool(flag) => Ok(AttributeValue::Bool(*flag)),
        Value::Null => Ok(AttributeValue::Null(true)),
        _ => Err("filter values must be scalar".to_string()),
    }
}
