//! Trip Document Model
//!
//! Records mirroring the single trip document kept in the cloud store.
//! Decoding is lenient: a collection that is missing or not a list decodes
//! to `None` ("not loaded yet"), and individual records that fail to decode
//! are dropped instead of failing the whole document.
//!
//! Records that the app can remove or rewrite keep the exact value they were
//! read from, because the store's array-remove only matches equal values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::firestore::to_json;
use crate::DomainResult;

/// The whole trip document (`currentData`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripData {
    #[serde(default, deserialize_with = "lenient::list", skip_serializing_if = "Option::is_none")]
    pub itinerary_data: Option<Vec<DayEntry>>,
    #[serde(default, deserialize_with = "lenient::list", skip_serializing_if = "Option::is_none")]
    pub activities_data: Option<Vec<Activity>>,
    #[serde(default, deserialize_with = "lenient::packing_map", skip_serializing_if = "Option::is_none")]
    pub packing_list_data: Option<BTreeMap<String, Vec<PackingItem>>>,
    #[serde(default, deserialize_with = "lenient::records", skip_serializing_if = "Option::is_none")]
    pub interactive_packing: Option<Vec<SharedPackingItem>>,
    #[serde(default, deserialize_with = "lenient::records", skip_serializing_if = "Option::is_none")]
    pub bulletin_board: Option<Vec<BulletinPost>>,
    #[serde(default, deserialize_with = "lenient::records", skip_serializing_if = "Option::is_none")]
    pub family_memories: Option<Vec<Memory>>,
    #[serde(default, deserialize_with = "lenient::records", skip_serializing_if = "Option::is_none")]
    pub photo_album: Option<Vec<Photo>>,
    #[serde(default, deserialize_with = "lenient::records", skip_serializing_if = "Option::is_none")]
    pub packing_photos: Option<Vec<Photo>>,
    #[serde(default, deserialize_with = "lenient::records", skip_serializing_if = "Option::is_none")]
    pub luggage_data: Option<Vec<Luggage>>,
    #[serde(default, deserialize_with = "lenient::records", skip_serializing_if = "Option::is_none")]
    pub chat_messages: Option<Vec<ChatMessage>>,
    #[serde(default, deserialize_with = "lenient::records", skip_serializing_if = "Option::is_none")]
    pub custom_plans: Option<Vec<CustomPlan>>,
    /// Category lists of `packingListData` as stored, undecodable entries included
    #[serde(skip)]
    pub packing_raw: BTreeMap<String, Vec<Value>>,
}

impl TripData {
    /// Decode a trip document from plain JSON (already unwrapped from store values)
    pub fn from_json(value: Value) -> Self {
        let packing_raw: BTreeMap<String, Vec<Value>> = value
            .get("packingListData")
            .and_then(Value::as_object)
            .map(|categories| {
                categories
                    .iter()
                    .filter_map(|(name, items)| Some((name.clone(), items.as_array()?.clone())))
                    .collect()
            })
            .unwrap_or_default();
        let mut data: TripData = serde_json::from_value(value).unwrap_or_default();
        if data.packing_list_data.is_some() {
            data.packing_raw = packing_raw;
        }
        data
    }

    /// A trip with every collection loaded and empty (document not created yet)
    pub fn empty() -> Self {
        Self {
            itinerary_data: Some(Vec::new()),
            activities_data: Some(Vec::new()),
            packing_list_data: Some(BTreeMap::new()),
            interactive_packing: Some(Vec::new()),
            bulletin_board: Some(Vec::new()),
            family_memories: Some(Vec::new()),
            photo_album: Some(Vec::new()),
            packing_photos: Some(Vec::new()),
            luggage_data: Some(Vec::new()),
            chat_messages: Some(Vec::new()),
            custom_plans: Some(Vec::new()),
            packing_raw: BTreeMap::new(),
        }
    }

    /// Find an activity by id, falling back to a name match
    pub fn find_activity(&self, key: &str) -> Option<&Activity> {
        let activities = self.activities_data.as_ref()?;
        activities
            .iter()
            .find(|a| a.id == key)
            .or_else(|| activities.iter().find(|a| a.name == key))
    }
}

/// List-valued fields of the trip document that take array union/remove writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Activities,
    InteractivePacking,
    BulletinBoard,
    FamilyMemories,
    PhotoAlbum,
    PackingPhotos,
    Luggage,
    ChatMessages,
    CustomPlans,
}

impl Collection {
    /// Field name inside the stored document
    pub fn field(&self) -> &'static str {
        match self {
            Collection::Activities => "activitiesData",
            Collection::InteractivePacking => "interactivePacking",
            Collection::BulletinBoard => "bulletinBoard",
            Collection::FamilyMemories => "familyMemories",
            Collection::PhotoAlbum => "photoAlbum",
            Collection::PackingPhotos => "packingPhotos",
            Collection::Luggage => "luggageData",
            Collection::ChatMessages => "chatMessages",
            Collection::CustomPlans => "customPlans",
        }
    }
}

/// A list element that remembers the value it was decoded from
pub trait StoredRecord: Serialize {
    fn raw(&self) -> Option<&Value>;
    fn set_raw(&mut self, raw: Value);

    /// The value as held by the store; records never read back encode themselves
    fn stored_value(&self) -> DomainResult<Value> {
        match self.raw() {
            Some(raw) => Ok(raw.clone()),
            None => to_json(self),
        }
    }

    /// The stored value with `keys` taken from this record. Other stored
    /// fields, unknown ones included, are left as they were.
    fn patched_value(&self, keys: &[&str]) -> DomainResult<Value> {
        let current = to_json(self)?;
        let mut value = self.stored_value()?;
        match (&mut value, &current) {
            (Value::Object(stored), Value::Object(fields)) => {
                for key in keys {
                    match fields.get(*key) {
                        Some(field) => {
                            stored.insert(key.to_string(), field.clone());
                        }
                        None => {
                            stored.remove(*key);
                        }
                    }
                }
                Ok(value)
            }
            _ => Ok(current),
        }
    }
}

macro_rules! stored_record {
    ($($ty:ty),* $(,)?) => {$(
        impl StoredRecord for $ty {
            fn raw(&self) -> Option<&Value> {
                self.raw.as_ref()
            }

            fn set_raw(&mut self, raw: Value) {
                self.raw = Some(raw);
            }
        }
    )*};
}

stored_record!(SharedPackingItem, BulletinPost, Memory, Photo, Luggage, ChatMessage, CustomPlan);

// ========================
// Itinerary
// ========================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayEntry {
    #[serde(default, deserialize_with = "lenient::uint")]
    pub day_index: u32,
    #[serde(default, deserialize_with = "lenient::string")]
    pub day_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default)]
    pub main_plan: Plan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_plan: Option<Plan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_plan2: Option<Plan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solo_tip: Option<String>,
}

impl DayEntry {
    pub fn plan(&self, choice: PlanChoice) -> Option<&Plan> {
        match choice {
            PlanChoice::Main => Some(&self.main_plan),
            PlanChoice::Alternative => self.alternative_plan.as_ref(),
            PlanChoice::Alternative2 => self.alternative_plan2.as_ref(),
        }
    }

    /// Plans this day offers, in display order
    pub fn available_plans(&self) -> Vec<PlanChoice> {
        let mut plans = vec![PlanChoice::Main];
        if self.alternative_plan.is_some() {
            plans.push(PlanChoice::Alternative);
        }
        if self.alternative_plan2.is_some() {
            plans.push(PlanChoice::Alternative2);
        }
        plans
    }
}

/// Which of a day's plans is on screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PlanChoice {
    #[default]
    Main,
    Alternative,
    Alternative2,
}

impl PlanChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanChoice::Main => "main",
            PlanChoice::Alternative => "alternative",
            PlanChoice::Alternative2 => "alternative2",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "alternative" => PlanChoice::Alternative,
            "alternative2" => PlanChoice::Alternative2,
            _ => PlanChoice::Main,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlanChoice::Main => "תוכנית ראשית",
            PlanChoice::Alternative => "חלופה",
            PlanChoice::Alternative2 => "חלופה נוספת",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::list_or_empty")]
    pub items: Vec<PlanItem>,
}

/// A plan entry either points at an activity or carries free text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanItem {
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ========================
// Activities
// ========================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category: String,
    /// Travel time; stored either as minutes or as text like "25 דקות"
    #[serde(default, deserialize_with = "lenient::string")]
    pub time: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub cost: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub transport: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::opt_float", skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_float", skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated: Option<bool>,
}

impl Activity {
    /// Travel time in minutes: the first run of digits in `time`
    pub fn travel_minutes(&self) -> Option<u32> {
        let digits: String = self
            .time
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    }

    /// Key used for "new item" highlighting
    pub fn highlight_key(&self) -> String {
        if self.id.is_empty() {
            format!("activity:{}", self.name)
        } else {
            format!("activity:{}", self.id)
        }
    }

    pub fn map_url(&self) -> Option<String> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(format!("https://www.google.com/maps?q={},{}", lat, lon)),
            _ if !self.address.is_empty() => Some(format!(
                "https://www.google.com/maps/search/?api=1&query={}",
                percent_encoding::utf8_percent_encode(&self.address, percent_encoding::NON_ALPHANUMERIC)
            )),
            _ => None,
        }
    }
}

// ========================
// Packing
// ========================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackingItem {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default)]
    pub checked: bool,
}

/// Packing item added by a family member at runtime
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedPackingItem {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub added_by: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default, deserialize_with = "lenient::string")]
    pub timestamp: String,
    #[serde(skip)]
    pub raw: Option<Value>,
}

// ========================
// Family content
// ========================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulletinPost {
    #[serde(default, deserialize_with = "lenient::string")]
    pub author: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub message: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub timestamp: String,
    #[serde(skip)]
    pub raw: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    #[serde(default, deserialize_with = "lenient::string")]
    pub author: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::opt_uint", skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub timestamp: String,
    #[serde(skip)]
    pub raw: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub caption: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub uploaded_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
    /// Upload failed and `url` is a blob URL only valid in this tab
    #[serde(default, skip_serializing)]
    pub is_local: bool,
    #[serde(default, deserialize_with = "lenient::string")]
    pub timestamp: String,
    #[serde(skip)]
    pub raw: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Luggage {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub owner: String,
    #[serde(default, deserialize_with = "lenient::list_or_empty")]
    pub items: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub timestamp: String,
    #[serde(skip)]
    pub raw: Option<Value>,
}

impl Luggage {
    /// Bags have no id; name, owner and creation time identify one
    pub fn same_bag(&self, other: &Luggage) -> bool {
        self.name == other.name && self.owner == other.owner && self.timestamp == other.timestamp
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    #[default]
    User,
    #[serde(alias = "ai", alias = "model", alias = "bot")]
    Assistant,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: ChatRole,
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub timestamp: String,
    #[serde(skip)]
    pub raw: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomPlan {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient::opt_uint", skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub timestamp: String,
    #[serde(skip)]
    pub raw: Option<Value>,
}

/// Lenient field decoders for loosely-typed stored documents
mod lenient {
    use std::collections::BTreeMap;

    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::{PackingItem, StoredRecord};

    fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
        items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()
    }

    pub fn list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => Some(decode_items(items)),
            _ => None,
        })
    }

    /// Like `list`, keeping each element's stored value on the record
    pub fn records<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + StoredRecord,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .filter_map(|item| {
                        let mut record: T = serde_json::from_value(item.clone()).ok()?;
                        record.set_raw(item);
                        Some(record)
                    })
                    .collect(),
            ),
            _ => None,
        })
    }

    pub fn list_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(list(deserializer)?.unwrap_or_default())
    }

    pub fn packing_map<'de, D>(
        deserializer: D,
    ) -> Result<Option<BTreeMap<String, Vec<PackingItem>>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Object(categories) => Some(
                categories
                    .into_iter()
                    .filter_map(|(name, items)| match items {
                        Value::Array(items) => Some((name, decode_items(items))),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => None,
        })
    }

    fn as_text(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(as_text(Value::deserialize(deserializer)?).unwrap_or_default())
    }

    pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(as_text(Value::deserialize(deserializer)?))
    }

    fn as_number(value: Value) -> Option<f64> {
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        number.filter(|n: &f64| n.is_finite())
    }

    /// Whole non-negative numbers, as numbers (`2`, `2.0`) or text (`"2"`)
    pub fn opt_uint<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(as_number(Value::deserialize(deserializer)?)
            .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX))
            .map(|n| n as u32))
    }

    pub fn uint<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_uint(deserializer)?.unwrap_or_default())
    }

    pub fn opt_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(as_number(Value::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_collections_stay_unloaded() {
        let data = TripData::from_json(json!({ "bulletinBoard": [] }));
        assert!(data.itinerary_data.is_none());
        assert!(data.activities_data.is_none());
        assert_eq!(data.bulletin_board, Some(vec![]));
    }

    #[test]
    fn test_non_array_collection_is_unloaded() {
        let data = TripData::from_json(json!({ "activitiesData": { "oops": 1 } }));
        assert!(data.activities_data.is_none());
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let data = TripData::from_json(json!({
            "chatMessages": [
                { "role": "user", "text": "שלום", "timestamp": "2025-07-01T10:00:00Z" },
                "not a record",
                { "role": "ai", "text": "היי" }
            ]
        }));
        let messages = data.chat_messages.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert_eq!(messages[1].raw, Some(json!({ "role": "ai", "text": "היי" })));
    }

    #[test]
    fn test_numbers_stored_as_text() {
        let data = TripData::from_json(json!({
            "itineraryData": [
                { "dayIndex": "2", "title": "שני" },
                { "dayIndex": 3.0, "title": "שלישי" },
                { "dayIndex": "x", "title": "?" }
            ],
            "activitiesData": [{ "name": "Jet d'Eau", "lat": "46.2073", "lon": 6.1557 }],
            "familyMemories": [{ "text": "גלידה", "day": "4" }]
        }));
        let days = data.itinerary_data.unwrap();
        assert_eq!(days.iter().map(|d| d.day_index).collect::<Vec<_>>(), vec![2, 3, 0]);
        let activity = &data.activities_data.unwrap()[0];
        assert_eq!(activity.lat, Some(46.2073));
        assert_eq!(activity.lon, Some(6.1557));
        assert_eq!(data.family_memories.unwrap()[0].day, Some(4));
    }

    #[test]
    fn test_patched_value_keeps_unknown_fields() {
        let stored = json!({ "name": "משקפת", "checked": false, "addedBy": "אבא", "qty": 2 });
        let data = TripData::from_json(json!({ "interactivePacking": [stored.clone()] }));
        let mut item = data.interactive_packing.unwrap().remove(0);
        assert_eq!(item.stored_value().unwrap(), stored);
        item.checked = true;
        let patched = item.patched_value(&["checked"]).unwrap();
        assert_eq!(patched["checked"], json!(true));
        assert_eq!(patched["qty"], json!(2));
        assert!(patched.get("timestamp").is_none());
    }

    #[test]
    fn test_numeric_ids_and_times() {
        let data = TripData::from_json(json!({
            "activitiesData": [
                { "id": 7, "name": "אגם ז'נבה", "category": "טבע", "time": 15 },
                { "id": "cern", "name": "CERN", "category": "מדע", "time": "כ-35 דקות" }
            ]
        }));
        let activities = data.activities_data.as_ref().unwrap();
        assert_eq!(activities[0].id, "7");
        assert_eq!(activities[0].travel_minutes(), Some(15));
        assert_eq!(activities[1].travel_minutes(), Some(35));
        assert_eq!(data.find_activity("CERN").map(|a| a.id.as_str()), Some("cern"));
    }

    #[test]
    fn test_packing_map_decoding() {
        let data = TripData::from_json(json!({
            "packingListData": {
                "בגדים": [ { "name": "מעיל", "checked": true }, { "name": "כובע" } ],
                "broken": "x"
            }
        }));
        assert_eq!(data.packing_raw.len(), 1);
        let packing = data.packing_list_data.unwrap();
        assert_eq!(packing.len(), 1);
        assert_eq!(packing["בגדים"].len(), 2);
        assert!(!packing["בגדים"][1].checked);
    }

    #[test]
    fn test_day_plans() {
        let data = TripData::from_json(json!({
            "itineraryData": [{
                "dayIndex": 1,
                "dayName": "ראשון",
                "title": "נחיתה",
                "mainPlan": { "title": "העיר העתיקה", "items": [ { "activityId": 3 }, { "description": "ארוחת ערב" } ] },
                "alternativePlan2": { "title": "גשם", "items": [] }
            }]
        }));
        let day = &data.itinerary_data.unwrap()[0];
        assert_eq!(day.main_plan.items[0].activity_id.as_deref(), Some("3"));
        assert_eq!(day.available_plans(), vec![PlanChoice::Main, PlanChoice::Alternative2]);
        assert!(day.plan(PlanChoice::Alternative).is_none());
    }
}
