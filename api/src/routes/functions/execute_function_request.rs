use serde::Deserialize;
use serde_json::{Map, Value};

/// Body of `POST /functions/{function_id}`. A missing `parameters` key means `{}`.
#[derive(Debug, Deserialize)]
pub struct ExecuteFunctionRequest {
    #[serde(default)]
    pub parameters: Map<String, Value>,
}
