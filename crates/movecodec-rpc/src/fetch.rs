//! The fetch adapter: read one object and decode it with a descriptor.

use movecodec_core::{compress, Address, Reified};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchError;
use crate::object::{ObjectData, ObjectResponse};
use crate::reader::{ObjectReader, ReadMode};

/// Fetch adapter configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Representation requested from the node.
    pub mode: ReadMode,
}

/// Fetch the object at `id` and decode it as `ty`.
///
/// Exactly one request is made. With [`ReadMode::Bcs`] the object's declared
/// type is checked against `ty` before its bytes are decoded; with
/// [`ReadMode::Content`] the typed content is checked field by field.
pub async fn fetch<T, R>(reader: &R, ty: &Reified<T>, id: &Address, mode: ReadMode) -> Result<T, FetchError>
where
    R: ObjectReader + ?Sized,
{
    tracing::debug!(object_id = %id, type_name = %ty.type_tag(), %mode, "fetching object");
    let resp = reader.get_object(id, mode).await?;
    let data = object_data(id, resp)?;

    let value = match mode {
        ReadMode::Bcs => decode_bcs(id, ty, &data),
        ReadMode::Content => decode_content(id, ty, &data),
    };
    if let Err(e) = &value {
        tracing::debug!(object_id = %id, error = %e, "object decode failed");
    }
    value
}

/// [`fetch`] using the typed `content` of the object.
pub async fn fetch_parsed<T, R>(reader: &R, ty: &Reified<T>, id: &Address) -> Result<T, FetchError>
where
    R: ObjectReader + ?Sized,
{
    fetch(reader, ty, id, ReadMode::Content).await
}

/// [`fetch`] with the mode taken from `config`.
pub async fn fetch_with<T, R>(
    reader: &R,
    ty: &Reified<T>,
    id: &Address,
    config: &FetchConfig,
) -> Result<T, FetchError>
where
    R: ObjectReader + ?Sized,
{
    fetch(reader, ty, id, config.mode).await
}

fn object_data(id: &Address, resp: ObjectResponse) -> Result<ObjectData, FetchError> {
    if let Some(err) = resp.error {
        return Err(FetchError::NotFound {
            id: id.to_hex_literal(),
            code: err.code,
        });
    }
    resp.data.ok_or_else(|| FetchError::NotFound {
        id: id.to_hex_literal(),
        code: "noData".into(),
    })
}

/// Verifies the declared object type names `ty`, mapping any disagreement to
/// [`FetchError::WrongType`].
fn check_declared<T>(id: &Address, ty: &Reified<T>, declared: Option<&str>) -> Result<(), FetchError> {
    let wrong = |got: String| FetchError::WrongType {
        id: id.to_hex_literal(),
        expected: ty.type_name(),
        got,
    };
    let declared = declared.ok_or_else(|| wrong("<none>".into()))?;
    match ty.check_type(declared) {
        Ok(()) => Ok(()),
        Err(e) if e.is_type_mismatch() => Err(wrong(compress(declared)?)),
        Err(e) => Err(e.into()),
    }
}

fn decode_bcs<T>(id: &Address, ty: &Reified<T>, data: &ObjectData) -> Result<T, FetchError> {
    let raw = data.bcs.as_ref().ok_or_else(|| FetchError::MalformedResponse {
        id: id.to_hex_literal(),
        reason: "response has no bcs section".into(),
    })?;
    if !raw.is_move_object() {
        return Err(FetchError::WrongType {
            id: id.to_hex_literal(),
            expected: ty.type_name(),
            got: raw.data_type.clone(),
        });
    }
    check_declared(id, ty, raw.type_.as_deref())?;

    let bytes = raw
        .bytes()
        .ok_or_else(|| FetchError::MalformedResponse {
            id: id.to_hex_literal(),
            reason: "bcs section has no bcsBytes".into(),
        })?
        .map_err(|e| FetchError::MalformedResponse {
            id: id.to_hex_literal(),
            reason: format!("bcsBytes is not base64: {e}"),
        })?;
    Ok(ty.from_bcs(&bytes)?)
}

fn decode_content<T>(id: &Address, ty: &Reified<T>, data: &ObjectData) -> Result<T, FetchError> {
    let content = data.content.as_ref().ok_or_else(|| FetchError::MalformedResponse {
        id: id.to_hex_literal(),
        reason: "response has no content".into(),
    })?;
    match content.get("dataType").and_then(Value::as_str) {
        Some("moveObject") => {}
        other => {
            return Err(FetchError::WrongType {
                id: id.to_hex_literal(),
                expected: ty.type_name(),
                got: other.unwrap_or("<none>").to_string(),
            })
        }
    }
    check_declared(id, ty, content.get("type").and_then(Value::as_str))?;
    Ok(ty.from_parsed_data(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::tests::{MockTransport, Reply};
    use crate::reader::SuiRpcReader;
    use crate::TransportError;
    use movecodec_core::{MoveStruct, PhantomReified};
    use movecodec_sui::{Balance, SUI};
    use serde_json::json;

    const BALANCE_SUI: &str = "0x2::balance::Balance<0x2::sui::SUI>";

    fn reader(result: Value) -> SuiRpcReader {
        SuiRpcReader::new(MockTransport::ok(result))
    }

    fn bcs_response(type_: &str, bcs_bytes: &str) -> Value {
        json!({
            "data": {
                "objectId": "0x5",
                "bcs": {
                    "dataType": "moveObject",
                    "type": type_,
                    "hasPublicTransfer": false,
                    "version": 3,
                    "bcsBytes": bcs_bytes
                }
            }
        })
    }

    #[tokio::test]
    async fn fetches_and_decodes_bcs() {
        let r = reader(bcs_response(BALANCE_SUI, "QEIPAAAAAAA="));
        let ty = Balance::reified(&SUI::phantom());
        let b = fetch(&r, &ty, &Address::from_u8(5), ReadMode::Bcs).await.unwrap();
        assert_eq!(b.value, 1_000_000);
        assert_eq!(b.type_name(), BALANCE_SUI);
    }

    #[tokio::test]
    async fn fetches_parsed_content() {
        let r = reader(json!({
            "data": {
                "objectId": "0x5",
                "content": {
                    "dataType": "moveObject",
                    "type": "0x2::balance::Supply<0x2::sui::SUI>",
                    "hasPublicTransfer": false,
                    "fields": { "value": "77" }
                }
            }
        }));
        let ty = movecodec_sui::Supply::reified(&SUI::phantom());
        let s = fetch_parsed(&r, &ty, &Address::from_u8(5)).await.unwrap();
        assert_eq!(s.value, 77);
    }

    #[tokio::test]
    async fn other_coin_is_wrong_type() {
        let r = reader(bcs_response("0x2::balance::Balance<0xabc::other::OTHER>", "QEIPAAAAAAA="));
        let ty = Balance::reified(&SUI::phantom());
        match fetch(&r, &ty, &Address::from_u8(5), ReadMode::Bcs).await {
            Err(FetchError::WrongType { expected, got, .. }) => {
                assert_eq!(expected, BALANCE_SUI);
                assert_eq!(got, "0x2::balance::Balance<0xabc::other::OTHER>");
            }
            other => panic!("expected WrongType, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_object_is_not_found() {
        let r = reader(json!({ "error": { "code": "deleted", "object_id": "0x5" } }));
        let ty = Balance::reified(&SUI::phantom());
        let err = fetch(&r, &ty, &Address::from_u8(5), ReadMode::Bcs).await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound { ref code, .. } if code == "deleted"));
    }

    #[tokio::test]
    async fn package_is_wrong_type() {
        let r = reader(json!({
            "data": { "objectId": "0x5", "bcs": { "dataType": "package" } }
        }));
        let ty = Balance::reified(&PhantomReified::parse("0x3::x::X").unwrap());
        let err = fetch(&r, &ty, &Address::from_u8(5), ReadMode::Bcs).await.unwrap_err();
        assert!(matches!(err, FetchError::WrongType { ref got, .. } if got == "package"));
    }

    #[tokio::test]
    async fn bad_payloads_are_reported() {
        let ty = Balance::reified(&SUI::phantom());
        let id = Address::from_u8(5);

        let r = reader(bcs_response(BALANCE_SUI, "not base64!"));
        let err = fetch(&r, &ty, &id, ReadMode::Bcs).await.unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse { .. }));

        // 7 bytes where a u64 needs 8
        let r = reader(bcs_response(BALANCE_SUI, "QEIPAAAAAA=="));
        let err = fetch(&r, &ty, &id, ReadMode::Bcs).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn transport_failures_pass_through() {
        let r = SuiRpcReader::new(MockTransport::rpc_error(-32000, "node down"));
        let ty = Balance::reified(&SUI::phantom());
        let err = fetch_with(&r, &ty, &Address::from_u8(5), &FetchConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport(TransportError::Rpc(_))));

        let r = SuiRpcReader::new(MockTransport::new(Reply::Down("connection refused".into())));
        let err = fetch(&r, &ty, &Address::from_u8(5), ReadMode::Bcs).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(TransportError::Http(ref m)) if m == "connection refused"));
    }

    #[test]
    fn config_defaults_to_bcs() {
        let cfg: FetchConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(cfg.mode, ReadMode::Bcs);
        let cfg: FetchConfig = serde_json::from_value(json!({ "mode": "content" })).unwrap();
        assert_eq!(cfg.mode, ReadMode::Content);
    }
}
