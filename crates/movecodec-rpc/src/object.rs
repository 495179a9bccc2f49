//! `sui_getObject` response shapes.
//!
//! Only the parts the fetch adapter reads are typed. `content` stays a raw
//! JSON value; its shape depends on the object's type.

use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One object lookup result: either `data` or `error` is set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ObjectData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ObjectResponseError>,
}

/// Node-side lookup failure, e.g. `{ "code": "notExists", "object_id": "0x.." }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectResponseError {
    pub code: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectData {
    pub object_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    /// Present when requested with `showBcs`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcs: Option<RawObject>,
    /// Present when requested with `showContent`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

/// The `bcs` section of an object response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawObject {
    /// `moveObject` or `package`.
    pub data_type: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_public_transfer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    /// Base64 of the object's BCS contents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcs_bytes: Option<String>,
}

impl RawObject {
    pub fn is_move_object(&self) -> bool {
        self.data_type == "moveObject"
    }

    /// Decoded `bcsBytes`, if present.
    pub fn bytes(&self) -> Option<Result<Vec<u8>, base64::DecodeError>> {
        self.bcs_bytes
            .as_deref()
            .map(|b64| base64::engine::general_purpose::STANDARD.decode(b64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_bcs_response() {
        let resp: ObjectResponse = serde_json::from_value(json!({
            "data": {
                "objectId": "0x5",
                "version": "12",
                "digest": "9WvX",
                "bcs": {
                    "dataType": "moveObject",
                    "type": "0x2::balance::Balance<0x2::sui::SUI>",
                    "hasPublicTransfer": false,
                    "version": 12,
                    "bcsBytes": "QEIPAAAAAAA="
                }
            }
        }))
        .unwrap();
        let bcs = resp.data.unwrap().bcs.unwrap();
        assert!(bcs.is_move_object());
        assert_eq!(bcs.bytes().unwrap().unwrap(), 1_000_000u64.to_le_bytes());
    }

    #[test]
    fn parses_error_response() {
        let resp: ObjectResponse = serde_json::from_value(json!({
            "error": { "code": "notExists", "object_id": "0x5" }
        }))
        .unwrap();
        let err = resp.error.unwrap();
        assert_eq!(err.code, "notExists");
        assert_eq!(err.details["object_id"], "0x5");
        assert!(resp.data.is_none());
    }
}
