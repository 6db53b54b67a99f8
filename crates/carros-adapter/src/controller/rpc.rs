//! JSON-RPC endpoint for car registration
//!
//! One JSON-RPC 2.0 message per line. The only method is `AddCar`
//! (`carros.CarsService/AddCar` is accepted as an alias):
//!
//! ```text
//! → {"jsonrpc":"2.0","id":1,"method":"AddCar","params":{"model":"Gol","plate":"HPX-1234"}}
//! ← {"jsonrpc":"2.0","id":1,"result":{"id":1}}
//! ```
//!
//! Failures carry the status code number, its description, and the status
//! name in `data.status`.

use std::sync::Arc;

use carros_domain::{AddCarRequest, CarRepository};
use carros_usecase::CarRegistrationService;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::status::Status;

pub const JSONRPC_VERSION: &str = "2.0";
pub const ADD_CAR_METHOD: &str = "AddCar";
pub const ADD_CAR_METHOD_QUALIFIED: &str = "carros.CarsService/AddCar";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;

/// Incoming JSON-RPC request
#[derive(Debug, Clone, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    /// `None` only when the member is absent (a notification); an explicit
    /// `null` id is kept as `Some(Value::Null)` and still gets a reply
    #[serde(default, deserialize_with = "present")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Outgoing JSON-RPC response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn parse_error(detail: impl core::fmt::Display) -> Self {
        Self {
            code: PARSE_ERROR,
            message: format!("parse error: {}", detail),
            data: None,
        }
    }

    pub fn invalid_request(detail: impl core::fmt::Display) -> Self {
        Self {
            code: INVALID_REQUEST,
            message: format!("invalid request: {}", detail),
            data: None,
        }
    }
}

impl From<Status> for RpcError {
    fn from(status: Status) -> Self {
        let mut data = serde_json::json!({ "status": status.code.name() });
        if !status.fields.is_empty() {
            data["fields"] = Value::from(status.fields);
        }

        Self {
            code: i64::from(status.code.code()),
            message: status.description,
            data: Some(data),
        }
    }
}

/// `AddCar` params; missing fields read as empty and fail validation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddCarParams {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub plate: String,
}

impl From<AddCarParams> for AddCarRequest {
    fn from(params: AddCarParams) -> Self {
        AddCarRequest::new(params.model, params.plate)
    }
}

/// `AddCar` result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddCarResponse {
    pub id: u64,
}

/// Routes JSON-RPC messages to the registration service
///
/// Cheap to clone; clones share the service.
#[derive(Debug)]
pub struct CarsEndpoint<R> {
    service: Arc<CarRegistrationService<R>>,
}

impl<R> Clone for CarsEndpoint<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<R: CarRepository> CarsEndpoint<R> {
    pub fn new(service: Arc<CarRegistrationService<R>>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &CarRegistrationService<R> {
        &self.service
    }

    /// `AddCar` with typed params
    pub fn add_car(&self, params: AddCarParams) -> Result<AddCarResponse, Status> {
        self.service
            .add(params.into())
            .map(|record| AddCarResponse {
                id: record.id().value(),
            })
            .map_err(Status::from)
    }

    /// Handle one raw wire frame (a line without its terminator).
    /// Bytes that are not UTF-8 get a parse error.
    pub fn handle_frame(&self, frame: &[u8]) -> Option<String> {
        match std::str::from_utf8(frame) {
            Ok(line) => self.handle_line(line),
            Err(e) => {
                warn!(error = %e, "RPC line is not UTF-8");
                encode(&RpcResponse::failure(Value::Null, RpcError::parse_error(e)))
            }
        }
    }

    /// Handle one wire line. Returns the serialized response, or `None`
    /// for blank lines and notifications.
    pub fn handle_line(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let response = match serde_json::from_str::<Value>(line) {
            Ok(message) => self.handle_message(message)?,
            Err(e) => {
                warn!(error = %e, "Unparseable RPC line");
                RpcResponse::failure(Value::Null, RpcError::parse_error(e))
            }
        };

        encode(&response)
    }

    /// Handle one decoded JSON value
    pub fn handle_message(&self, message: Value) -> Option<RpcResponse> {
        let fallback_id = message.get("id").cloned().unwrap_or(Value::Null);

        let request: RpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                return Some(RpcResponse::failure(
                    fallback_id,
                    RpcError::invalid_request(e),
                ))
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(RpcResponse::failure(
                fallback_id,
                RpcError::invalid_request(format!("unsupported jsonrpc '{}'", request.jsonrpc)),
            ));
        }

        self.handle_request(request)
    }

    /// Dispatch a decoded request
    pub fn handle_request(&self, request: RpcRequest) -> Option<RpcResponse> {
        debug!(method = %request.method, "RPC request");

        let outcome = match request.method.as_str() {
            ADD_CAR_METHOD | ADD_CAR_METHOD_QUALIFIED => self.dispatch_add_car(request.params),
            other => Err(Status::unimplemented(other)),
        };

        let id = request.id?;
        Some(match outcome {
            Ok(result) => RpcResponse::success(id, result),
            Err(status) => RpcResponse::failure(id, status.into()),
        })
    }

    fn dispatch_add_car(&self, params: Option<Value>) -> Result<Value, Status> {
        let params: AddCarParams = match params {
            None | Some(Value::Null) => AddCarParams::default(),
            Some(value) => serde_json::from_value(value).map_err(|e| {
                debug!(error = %e, "Malformed AddCar params");
                Status::invalid_argument()
            })?,
        };

        let response = self.add_car(params)?;
        serde_json::to_value(response).map_err(|_| Status::internal())
    }
}

/// Response for a frame longer than `limit` bytes, which is dropped unread
pub fn oversized_frame(limit: usize) -> Option<String> {
    encode(&RpcResponse::failure(
        Value::Null,
        RpcError::invalid_request(format!("line exceeds {} bytes", limit)),
    ))
}

fn encode(response: &RpcResponse) -> Option<String> {
    match serde_json::to_string(response) {
        Ok(json) => Some(json),
        Err(e) => {
            warn!(error = %e, "Failed to serialize RPC response");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::in_memory::InMemoryCarRepository;
    use carros_domain::{CarId, NewCar};
    use serde_json::json;

    fn endpoint() -> CarsEndpoint<InMemoryCarRepository> {
        CarsEndpoint::new(Arc::new(CarRegistrationService::new(
            InMemoryCarRepository::new(),
        )))
    }

    fn call(endpoint: &CarsEndpoint<InMemoryCarRepository>, request: Value) -> RpcResponse {
        let line = endpoint.handle_line(&request.to_string()).unwrap();
        serde_json::from_str(&line).unwrap()
    }

    fn add_car(model: &str, plate: &str) -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "AddCar",
            "params": { "model": model, "plate": plate }
        })
    }

    #[test]
    fn test_add_car_returns_id() {
        let endpoint = endpoint();

        let response = call(&endpoint, add_car("Gol", "HPX-1234"));

        assert_eq!(response.id, json!(1));
        assert!(response.error.is_none());
        let result: AddCarResponse = serde_json::from_value(response.result.unwrap()).unwrap();
        let repo = endpoint.service().repository();
        assert!(repo.exists_by_id(CarId::new(result.id)).unwrap());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_plate_is_already_exists() {
        let endpoint = endpoint();
        endpoint
            .service()
            .repository()
            .save(NewCar::new("Palio", "OIP-9876"))
            .unwrap();

        let response = call(&endpoint, add_car("Ferrari", "OIP-9876"));

        let error = response.error.unwrap();
        assert_eq!(error.code, 6);
        assert_eq!(error.message, "car with existing plate");
        assert_eq!(error.data.unwrap()["status"], "ALREADY_EXISTS");
        assert_eq!(endpoint.service().repository().count().unwrap(), 1);
    }

    #[test]
    fn test_blank_input_is_invalid_argument() {
        let endpoint = endpoint();

        let response = call(&endpoint, add_car("", ""));

        let error = response.error.unwrap();
        assert_eq!(error.code, 3);
        assert_eq!(error.message, "invalid input data");
        let data = error.data.unwrap();
        assert_eq!(data["status"], "INVALID_ARGUMENT");
        assert_eq!(data["fields"], json!(["model", "plate"]));
        assert_eq!(endpoint.service().repository().count().unwrap(), 0);
    }

    #[test]
    fn test_qualified_method_name() {
        let endpoint = endpoint();
        let mut request = add_car("Gol", "HPX-1234");
        request["method"] = json!("carros.CarsService/AddCar");

        let response = call(&endpoint, request);

        assert!(response.result.is_some());
    }

    #[test]
    fn test_unknown_method_is_unimplemented() {
        let endpoint = endpoint();
        let mut request = add_car("Gol", "HPX-1234");
        request["method"] = json!("ListCars");

        let response = call(&endpoint, request);

        let error = response.error.unwrap();
        assert_eq!(error.code, 12);
        assert!(error.message.contains("ListCars"));
        assert_eq!(endpoint.service().repository().count().unwrap(), 0);
    }

    #[test]
    fn test_add_car_direct() {
        let endpoint = endpoint();

        let first = endpoint
            .add_car(AddCarParams {
                model: "Gol".to_string(),
                plate: "HPX-1234".to_string(),
            })
            .unwrap();
        let second = endpoint
            .add_car(AddCarParams {
                model: "Gol".to_string(),
                plate: "HPX-1234".to_string(),
            })
            .unwrap_err();

        assert_eq!(first.id, 1);
        assert_eq!(second, Status::already_exists());
    }

    mod protocol_errors {
        use super::*;

        #[test]
        fn test_malformed_json_is_parse_error() {
            let endpoint = endpoint();

            let line = endpoint.handle_line("{not json").unwrap();
            let response: RpcResponse = serde_json::from_str(&line).unwrap();

            assert_eq!(response.id, Value::Null);
            assert_eq!(response.error.unwrap().code, PARSE_ERROR);
        }

        #[test]
        fn test_missing_method_is_invalid_request() {
            let endpoint = endpoint();

            let response = call(&endpoint, json!({ "jsonrpc": "2.0", "id": 7 }));

            assert_eq!(response.id, json!(7));
            assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
        }

        #[test]
        fn test_wrong_version_is_invalid_request() {
            let endpoint = endpoint();
            let mut request = add_car("Gol", "HPX-1234");
            request["jsonrpc"] = json!("1.0");

            let response = call(&endpoint, request);

            assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
            assert_eq!(endpoint.service().repository().count().unwrap(), 0);
        }

        #[test]
        fn test_missing_params_are_invalid_argument() {
            let endpoint = endpoint();

            let response = call(
                &endpoint,
                json!({ "jsonrpc": "2.0", "id": "a", "method": "AddCar" }),
            );

            assert_eq!(response.id, json!("a"));
            assert_eq!(response.error.unwrap().code, 3);
        }

        #[test]
        fn test_wrongly_typed_params_are_invalid_argument() {
            let endpoint = endpoint();

            let response = call(
                &endpoint,
                json!({
                    "jsonrpc": "2.0",
                    "id": 2,
                    "method": "AddCar",
                    "params": { "model": 42, "plate": true }
                }),
            );

            let error = response.error.unwrap();
            assert_eq!(error.code, 3);
            assert_eq!(error.message, "invalid input data");
        }

        #[test]
        fn test_blank_line_is_ignored() {
            let endpoint = endpoint();
            assert!(endpoint.handle_line("   ").is_none());
        }

        #[test]
        fn test_null_id_still_gets_response() {
            let endpoint = endpoint();
            let mut request = add_car("Gol", "HPX-1234");
            request["id"] = Value::Null;

            let line = endpoint.handle_line(&request.to_string()).unwrap();
            let response: RpcResponse = serde_json::from_str(&line).unwrap();

            assert_eq!(response.id, Value::Null);
            assert_eq!(response.result, Some(json!({ "id": 1 })));
        }

        #[test]
        fn test_non_utf8_frame_is_parse_error() {
            let endpoint = endpoint();

            let line = endpoint.handle_frame(b"\xff\xfe garbage").unwrap();
            let response: RpcResponse = serde_json::from_str(&line).unwrap();

            assert_eq!(response.id, Value::Null);
            assert_eq!(response.error.unwrap().code, PARSE_ERROR);
        }

        #[test]
        fn test_notification_gets_no_response_but_runs() {
            let endpoint = endpoint();
            let notification = json!({
                "jsonrpc": "2.0",
                "method": "AddCar",
                "params": { "model": "Gol", "plate": "HPX-1234" }
            });

            assert!(endpoint.handle_line(&notification.to_string()).is_none());
            assert_eq!(endpoint.service().repository().count().unwrap(), 1);
        }
    }
}
