//! Firestore REST Codec
//!
//! Converts between plain JSON and Firestore's typed value encoding, and
//! builds `:commit` requests for the three write shapes the app uses:
//! array union, array remove (by value equality) and dotted-path field set.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::model::StoredRecord;
use crate::{DomainError, DomainResult};

const API_ROOT: &str = "https://firestore.googleapis.com/v1";

/// Location of one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPath {
    pub project_id: String,
    pub collection: String,
    pub document_id: String,
}

impl DocumentPath {
    pub fn new(project_id: &str, collection: &str, document_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            collection: collection.to_string(),
            document_id: document_id.to_string(),
        }
    }

    fn database(&self) -> String {
        format!("projects/{}/databases/(default)", self.project_id)
    }

    /// Resource name used inside commit writes
    pub fn name(&self) -> String {
        format!("{}/documents/{}/{}", self.database(), self.collection, self.document_id)
    }

    pub fn get_url(&self, api_key: &str) -> String {
        format!("{}/{}?key={}", API_ROOT, self.name(), api_key)
    }

    pub fn commit_url(&self, api_key: &str) -> String {
        format!("{}/{}/documents:commit?key={}", API_ROOT, self.database(), api_key)
    }
}

// ========================
// Value codec
// ========================

/// Decode one typed Firestore value into plain JSON
pub fn decode_value(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return Value::Null;
    };
    let Some((kind, inner)) = obj.iter().next() else {
        return Value::Null;
    };
    match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => Value::Bool(inner.as_bool().unwrap_or(false)),
        "integerValue" => match inner {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            Value::Number(n) => Value::Number(n.clone()),
            _ => Value::Null,
        },
        "doubleValue" => match inner {
            Value::Number(n) => Value::Number(n.clone()),
            // NaN / Infinity come through as strings and have no JSON form
            _ => Value::Null,
        },
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "geoPointValue" => json!({
            "lat": inner.get("latitude").cloned().unwrap_or(Value::Null),
            "lon": inner.get("longitude").cloned().unwrap_or(Value::Null),
        }),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(decode_fields(inner.get("fields"))),
        _ => Value::Null,
    }
}

fn decode_fields(fields: Option<&Value>) -> Map<String, Value> {
    fields
        .and_then(Value::as_object)
        .map(|fields| {
            fields
                .iter()
                .map(|(key, value)| (key.clone(), decode_value(value)))
                .collect()
        })
        .unwrap_or_default()
}

/// Decode a document resource (`{name, fields, ...}`) into its plain JSON body
pub fn decode_document(document: &Value) -> Value {
    Value::Object(decode_fields(document.get("fields")))
}

/// Encode plain JSON into a typed Firestore value
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else if let Some(u) = n.as_u64() {
                json!({ "integerValue": u.to_string() })
            } else {
                json!({ "doubleValue": n })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
    }
}

fn encode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}

// ========================
// Field paths
// ========================

fn is_simple_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Join path segments into a Firestore field path, back-quoting segments
/// that are not plain identifiers (Hebrew category names, spaces, dots)
pub fn field_path(segments: &[String]) -> String {
    segments
        .iter()
        .map(|segment| {
            if is_simple_segment(segment) {
                segment.clone()
            } else {
                format!("`{}`", segment.replace('\\', "\\\\").replace('`', "\\`"))
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

// ========================
// Writes
// ========================

/// Plain JSON for a record about to be written
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> DomainResult<Value> {
    serde_json::to_value(value).map_err(|e| DomainError::InvalidInput(format!("cannot encode value: {}", e)))
}

/// One partial update of the trip document
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Append values missing from a list field
    ArrayUnion { field: String, values: Vec<Value> },
    /// Remove every element equal to one of the values
    ArrayRemove { field: String, values: Vec<Value> },
    /// Replace the value at a nested path (`packingListData.<category>`)
    SetField { path: Vec<String>, value: Value },
}

impl WriteOp {
    pub fn union<T: Serialize + ?Sized>(field: &str, value: &T) -> DomainResult<Self> {
        Ok(WriteOp::ArrayUnion { field: field.to_string(), values: vec![to_json(value)?] })
    }

    /// Remove a record by the value it was stored as
    pub fn remove<T: StoredRecord>(field: &str, record: &T) -> DomainResult<Self> {
        Ok(WriteOp::ArrayRemove { field: field.to_string(), values: vec![record.stored_value()?] })
    }

    pub fn set<T: Serialize + ?Sized>(path: &[&str], value: &T) -> DomainResult<Self> {
        Ok(WriteOp::SetField {
            path: path.iter().map(|s| s.to_string()).collect(),
            value: to_json(value)?,
        })
    }

    fn to_write(&self, document: &str) -> Value {
        match self {
            WriteOp::ArrayUnion { field, values } => json!({
                "transform": {
                    "document": document,
                    "fieldTransforms": [{
                        "fieldPath": field_path(&[field.clone()]),
                        "appendMissingElements": { "values": values.iter().map(encode_value).collect::<Vec<_>>() }
                    }]
                }
            }),
            WriteOp::ArrayRemove { field, values } => json!({
                "transform": {
                    "document": document,
                    "fieldTransforms": [{
                        "fieldPath": field_path(&[field.clone()]),
                        "removeAllFromArray": { "values": values.iter().map(encode_value).collect::<Vec<_>>() }
                    }]
                }
            }),
            WriteOp::SetField { path, value } => {
                // Nest the value so that `a.b` becomes {a: {mapValue: {fields: {b: value}}}}
                let mut fields = Map::new();
                if let Some((last, parents)) = path.split_last() {
                    let mut inner = Map::new();
                    inner.insert(last.clone(), encode_value(value));
                    for parent in parents.iter().rev() {
                        let mut outer = Map::new();
                        outer.insert(parent.clone(), json!({ "mapValue": { "fields": inner } }));
                        inner = outer;
                    }
                    fields = inner;
                }
                json!({
                    "update": { "name": document, "fields": fields },
                    "updateMask": { "fieldPaths": [field_path(path)] }
                })
            }
        }
    }
}

/// Body for `documents:commit`
pub fn commit_request(document: &DocumentPath, ops: &[WriteOp]) -> Value {
    let name = document.name();
    json!({ "writes": ops.iter().map(|op| op.to_write(&name)).collect::<Vec<_>>() })
}

/// Store acknowledgment for a committed batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteAck {
    #[serde(default)]
    pub commit_time: Option<String>,
    #[serde(default)]
    pub write_results: Vec<WriteResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResult {
    #[serde(default)]
    pub update_time: Option<String>,
}

/// Error body returned by Google REST APIs
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.code, self.status, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_document() {
        let doc = json!({
            "name": "projects/p/databases/(default)/documents/trips/geneva",
            "fields": {
                "bulletinBoard": { "arrayValue": { "values": [
                    { "mapValue": { "fields": {
                        "author": { "stringValue": "אמא" },
                        "pinned": { "booleanValue": true },
                        "likes": { "integerValue": "3" }
                    } } }
                ] } },
                "chatMessages": { "arrayValue": {} },
                "lat": { "doubleValue": 46.2 },
                "updated": { "timestampValue": "2025-07-01T10:00:00Z" },
                "nothing": { "nullValue": null }
            }
        });
        let plain = decode_document(&doc);
        assert_eq!(plain["bulletinBoard"][0]["author"], "אמא");
        assert_eq!(plain["bulletinBoard"][0]["pinned"], true);
        assert_eq!(plain["bulletinBoard"][0]["likes"], 3);
        assert_eq!(plain["chatMessages"], json!([]));
        assert_eq!(plain["lat"], 46.2);
        assert_eq!(plain["updated"], "2025-07-01T10:00:00Z");
        assert!(plain["nothing"].is_null());
    }

    #[test]
    fn test_encode_numbers() {
        assert_eq!(encode_value(&json!(5)), json!({ "integerValue": "5" }));
        assert_eq!(encode_value(&json!(2.5)), json!({ "doubleValue": 2.5 }));
        assert_eq!(decode_value(&encode_value(&json!({ "a": [1, "x", null] }))), json!({ "a": [1, "x", null] }));
    }

    #[test]
    fn test_field_path_quoting() {
        assert_eq!(field_path(&["packingListData".into(), "clothes".into()]), "packingListData.clothes");
        assert_eq!(field_path(&["packingListData".into(), "בגדים".into()]), "packingListData.`בגדים`");
        assert_eq!(field_path(&["a".into(), "x`y".into()]), "a.`x\\`y`");
        assert_eq!(field_path(&["1st".into()]), "`1st`");
    }

    #[test]
    fn test_commit_request_shapes() {
        let doc = DocumentPath::new("trip-proj", "trips", "geneva");
        let ops = vec![
            WriteOp::ArrayUnion { field: "bulletinBoard".into(), values: vec![json!({ "message": "hi" })] },
            WriteOp::ArrayRemove { field: "customPlans".into(), values: vec![json!("x")] },
            WriteOp::SetField { path: vec!["packingListData".into(), "בגדים".into()], value: json!([]) },
        ];
        let body = commit_request(&doc, &ops);
        let writes = body["writes"].as_array().unwrap();
        assert_eq!(writes.len(), 3);

        let union = &writes[0]["transform"];
        assert_eq!(union["document"], "projects/trip-proj/databases/(default)/documents/trips/geneva");
        assert_eq!(
            union["fieldTransforms"][0]["appendMissingElements"]["values"][0]["mapValue"]["fields"]["message"]["stringValue"],
            "hi"
        );
        assert!(writes[1]["transform"]["fieldTransforms"][0]["removeAllFromArray"].is_object());

        let set = &writes[2];
        assert_eq!(set["updateMask"]["fieldPaths"][0], "packingListData.`בגדים`");
        assert!(set["update"]["fields"]["packingListData"]["mapValue"]["fields"]["בגדים"]["arrayValue"].is_object());
    }

    #[test]
    fn test_urls() {
        let doc = DocumentPath::new("p", "trips", "geneva");
        assert_eq!(
            doc.get_url("k"),
            "https://firestore.googleapis.com/v1/projects/p/databases/(default)/documents/trips/geneva?key=k"
        );
        assert_eq!(
            doc.commit_url("k"),
            "https://firestore.googleapis.com/v1/projects/p/databases/(default)/documents:commit?key=k"
        );
    }
}
