use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The one API Gateway response wrapper shared by every HTTP handler. The
/// handlers this replaces each carried their own copy of this struct.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

pub fn success_response(status_code: u16, payload: impl Serialize) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json!({"Content-Type": "application/json"}),
        body: serde_json::to_string(&payload).expect("response payload should serialize"),
    }
}

pub fn error_response(status_code: u16, payload: Value) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json!({"Content-Type": "application/json"}),
        body: payload.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_response_serializes_payload_as_json_body() {
        let response = success_response(200, json!({"items": [], "count": 0}));

        assert_eq!(response.status_code, 200);
        assert_eq!(response.headers["Content-Type"], "application/json");
        let body: Value = serde_json::from_str(&response.body).expect("body should parse");
        assert_eq!(body["count"], 0);
    }

    #[test]
    fn status_code_uses_api_gateway_field_name() {
        let response = error_response(502, json!({"error": "backend_unavailable"}));
        let wire = serde_json::to_value(&response).expect("response should serialize");
        assert_eq!(wire["statusCode"], 502);
    }
}
