use serde_json::{json, Value};

use crate::adapters::page_store::PageStore;
use crate::response::{error_response, success_response, ApiGatewayResponse};
use crate::runtime::contract::{BackendUnavailable, Record, ScanSpec};
use crate::runtime::ids::guid;
use crate::runtime::ordering::ContentOrdering;

/// Accumulates every page of a filtered, projected table scan.
///
/// Records are appended exactly once, in the order each page returns them;
/// sorting is the caller's concern and happens once over the full sequence.
/// A page fetch failure aborts the scan and discards the accumulator —
/// silently truncated data is worse than no data. No internal retries: the
/// invoking environment owns retry policy.
pub fn scan_all(spec: &ScanSpec, store: &impl PageStore) -> Result<Vec<Record>, BackendUnavailable> {
    let mut records = Vec::new();
    let mut next_token: Option<String> = None;
    let mut pages_fetched = 0usize;

    loop {
        let page = store
            .scan_page(spec, next_token.as_deref())
            .map_err(BackendUnavailable::new)?;
        records.extend(page.records);
        pages_fetched += 1;

        match page.next_token {
            Some(token) => next_token = Some(token),
            None => break,
        }
    }

    log_list_info(
        "scan_completed",
        json!({
            "pages_fetched": pages_fetched,
            "records_accumulated": records.len(),
        }),
    );

    Ok(records)
}

pub fn handle_list_event(
    _event: Value,
    spec: &ScanSpec,
    ordering: &ContentOrdering,
    store: &impl PageStore,
) -> ApiGatewayResponse {
    let invocation_id = guid();
    log_list_info(
        "list_started",
        json!({
            "invocation_id": invocation_id.clone(),
            "filter": spec.filter.clone(),
            "projection": spec.projection.clone(),
        }),
    );

    let mut records = match scan_all(spec, store) {
        Ok(records) => records,
        Err(error) => {
            log_list_error(
                "list_failed",
                json!({
                    "invocation_id": invocation_id,
                    "error": error.message(),
                }),
            );
            return error_response(
                502,
                json!({
                    "error": "backend_unavailable",
                    "message": error.message(),
                }),
            );
        }
    };

    ordering.sort_newest_first(&mut records);

    log_list_info(
        "list_completed",
        json!({
            "invocation_id": invocation_id,
            "count": records.len(),
        }),
    );
    success_response(
        200,
        json!({
            "items": records,
            "count": records.len(),
        }),
    )
}

fn log_list_info(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "list_content_handler",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_list_error(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "list_content_handler",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
