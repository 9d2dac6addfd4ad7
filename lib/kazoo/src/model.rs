use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Tenant account document.
///
/// Only `id` is interpreted here (it is the join key for device lookup).
/// Everything else in the Kazoo document rides along in `extra` and is
/// handed to the template renderer untouched.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AccountRecord {
    /// Store-assigned unique id.
    pub id: String,

    /// Account name, as used in provisioning URLs.
    pub name: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccountRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }

    /// Build a record from a raw CouchDB document. `_id` and `name` are
    /// lifted out; the rest of the document stays in `extra`.
    pub fn from_doc(doc: Value) -> Result<Self, StoreError> {
        let mut fields = into_object(doc, "account")?;
        Ok(Self {
            id: take_string(&mut fields, &["_id", "id"])
                .ok_or_else(|| StoreError::Backend("account document has no _id".into()))?,
            name: take_string(&mut fields, &["name"])
                .ok_or_else(|| StoreError::Backend("account document has no name".into()))?,
            extra: fields,
        })
    }
}

/// Provisioned device document, keyed by (account id, MAC) in the store.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeviceRecord {
    pub id: String,

    /// Colon-delimited lowercase MAC address.
    pub mac_address: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeviceRecord {
    pub fn new(id: impl Into<String>, mac_address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mac_address: mac_address.into(),
            extra: Map::new(),
        }
    }

    pub fn from_doc(doc: Value) -> Result<Self, StoreError> {
        let mut fields = into_object(doc, "device")?;
        Ok(Self {
            id: take_string(&mut fields, &["_id", "id"])
                .ok_or_else(|| StoreError::Backend("device document has no _id".into()))?,
            mac_address: take_string(&mut fields, &["mac_address"])
                .ok_or_else(|| StoreError::Backend("device document has no mac_address".into()))?,
            extra: fields,
        })
    }
}

fn into_object(doc: Value, what: &str) -> Result<Map<String, Value>, StoreError> {
    match doc {
        Value::Object(fields) => Ok(fields),
        other => Err(StoreError::Backend(format!(
            "{what} document is not an object: {other}"
        ))),
    }
}

/// Remove the first matching key and return it as a string.
fn take_string(fields: &mut Map<String, Value>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(Value::String(s)) = fields.remove(*key) {
            return Some(s);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_from_couch_doc() {
        let account = AccountRecord::from_doc(serde_json::json!({
            "_id": "4f90e32f2b4f4d4d8f45cb3b6d4ef9e0",
            "_rev": "3-abc",
            "name": "acme",
            "realm": "acme.sip.example.com",
        }))
        .unwrap();
        assert_eq!(account.id, "4f90e32f2b4f4d4d8f45cb3b6d4ef9e0");
        assert_eq!(account.name, "acme");
        assert_eq!(account.extra["realm"], "acme.sip.example.com");
        assert_eq!(account.extra["_rev"], "3-abc");
    }

    #[test]
    fn device_from_couch_doc() {
        let device = DeviceRecord::from_doc(serde_json::json!({
            "_id": "dev1",
            "mac_address": "aa:bb:cc:dd:ee:ff",
            "sip": { "username": "1001", "password": "s3cret" },
        }))
        .unwrap();
        assert_eq!(device.mac_address, "aa:bb:cc:dd:ee:ff");
        assert_eq!(device.extra["sip"]["username"], "1001");
    }

    #[test]
    fn document_without_id_is_a_backend_error() {
        assert!(AccountRecord::from_doc(serde_json::json!({ "name": "acme" })).is_err());
        assert!(DeviceRecord::from_doc(serde_json::json!({ "_id": "d" })).is_err());
        assert!(AccountRecord::from_doc(serde_json::json!("not an object")).is_err());
    }

    #[test]
    fn extra_fields_survive_serialization() {
        let mut account = AccountRecord::new("42", "acme");
        account.extra.insert("realm".into(), "r.example.com".into());
        let value = serde_json::to_value(&account).unwrap();
        assert_eq!(value["id"], "42");
        assert_eq!(value["realm"], "r.example.com");
    }
}
