//! Trip Data Updates
//!
//! Each function applies one user change to the in-memory `TripData` and
//! returns the store writes that persist it. Nothing here talks to the
//! network; the caller commits the returned `WriteOp`s and reports the
//! acknowledgment.
//!
//! Removal from list fields goes through the store's array-remove, which
//! matches by full value: two structurally identical records are removed
//! together. Removals and rewrites therefore send each record's stored value
//! (see `StoredRecord`) and stored lists are patched in place, never
//! re-encoded from what the decoder kept.

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde_json::Value;

use crate::activities::merge_generated;
use crate::firestore::{to_json, WriteOp};
use crate::model::{
    Activity, BulletinPost, ChatMessage, ChatRole, Collection, CustomPlan, Luggage, Memory, PackingItem, Photo,
    SharedPackingItem, StoredRecord, TripData,
};
use crate::upload::UploadCategory;
use crate::{DomainError, DomainResult};

const PACKING_FIELD: &str = "packingListData";

/// Category for family-added items that did not pick one
pub const DEFAULT_PACKING_CATEGORY: &str = "כללי";

pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Short local time for display ("14/07 18:30"); unparseable input is returned as-is
pub fn display_time(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.with_timezone(&Local).format("%d/%m %H:%M").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

fn required(value: &str, what: &str) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(DomainError::InvalidInput(format!("{} is empty", what)))
    } else {
        Ok(value.to_string())
    }
}

/// Encode a new record and remember the encoding as its stored value
fn stamp<T: StoredRecord>(record: &mut T) -> DomainResult<Value> {
    let value = to_json(&*record)?;
    record.set_raw(value.clone());
    Ok(value)
}

/// Swap a record for its patched copy: remove the old stored value, add the new
fn replace_ops<T: StoredRecord>(field: &str, record: &mut T, keys: &[&str], before: Value) -> DomainResult<Vec<WriteOp>> {
    let after = record.patched_value(keys)?;
    record.set_raw(after.clone());
    Ok(vec![
        WriteOp::ArrayRemove { field: field.to_string(), values: vec![before] },
        WriteOp::ArrayUnion { field: field.to_string(), values: vec![after] },
    ])
}

fn take_at<T>(list: &mut Option<Vec<T>>, index: usize, what: &str) -> DomainResult<T> {
    match list.as_mut() {
        Some(items) if index < items.len() => Ok(items.remove(index)),
        _ => Err(DomainError::NotFound(format!("{} #{}", what, index))),
    }
}

// ========================
// Packing
// ========================

fn is_packing_item(value: &Value) -> bool {
    serde_json::from_value::<PackingItem>(value.clone()).is_ok()
}

/// Set `checked` on a stored packing entry, keeping its other fields
fn patch_checked(stored: &mut Value, item: &PackingItem) -> DomainResult<()> {
    match stored {
        Value::Object(fields) => {
            fields.insert("checked".to_string(), Value::Bool(item.checked));
        }
        other => *other = to_json(item)?,
    }
    Ok(())
}

/// Stored list for one category, or the decoded one when nothing was read
fn category_value(stored: Option<&Vec<Value>>, items: &[PackingItem]) -> DomainResult<Value> {
    match stored {
        Some(stored) => Ok(Value::Array(stored.clone())),
        None => to_json(items),
    }
}

/// Set one fixed packing item; persists the whole category list. Entries
/// the decoder skipped are written back untouched.
pub fn set_packing_checked(data: &mut TripData, category: &str, index: usize, checked: bool) -> DomainResult<WriteOp> {
    let items = data
        .packing_list_data
        .as_mut()
        .and_then(|list| list.get_mut(category))
        .ok_or_else(|| DomainError::NotFound(format!("packing category {}", category)))?;
    let item = items
        .get_mut(index)
        .ok_or_else(|| DomainError::NotFound(format!("packing item {}#{}", category, index)))?;
    item.checked = checked;
    if let Some(stored) = data.packing_raw.get_mut(category) {
        // the n-th decoded item is the n-th stored entry that decodes
        let slot = stored
            .iter_mut()
            .filter(|v| is_packing_item(v))
            .nth(index)
            .ok_or_else(|| DomainError::NotFound(format!("stored packing item {}#{}", category, index)))?;
        patch_checked(slot, item)?;
    }
    WriteOp::set(&[PACKING_FIELD, category], &category_value(data.packing_raw.get(category), &items[..])?)
}

/// Uncheck everything, fixed and shared. Each category with a checked item
/// is rewritten on its own, so categories the decoder skipped stay as stored.
pub fn reset_packing(data: &mut TripData) -> DomainResult<Vec<WriteOp>> {
    let mut ops = Vec::new();
    if let Some(list) = data.packing_list_data.as_mut() {
        for (category, items) in list.iter_mut() {
            if !items.iter().any(|i| i.checked) {
                continue;
            }
            items.iter_mut().for_each(|item| item.checked = false);
            if let Some(stored) = data.packing_raw.get_mut(category) {
                for (slot, item) in stored.iter_mut().filter(|v| is_packing_item(v)).zip(items.iter()) {
                    patch_checked(slot, item)?;
                }
            }
            let value = category_value(data.packing_raw.get(category), &items[..])?;
            ops.push(WriteOp::set(&[PACKING_FIELD, category.as_str()], &value)?);
        }
    }
    if let Some(shared) = data.interactive_packing.as_mut() {
        let field = Collection::InteractivePacking.field();
        let mut removed = Vec::new();
        let mut added = Vec::new();
        for item in shared.iter_mut().filter(|i| i.checked) {
            removed.push(item.stored_value()?);
            item.checked = false;
            let after = item.patched_value(&["checked"])?;
            item.set_raw(after.clone());
            added.push(after);
        }
        if !removed.is_empty() {
            ops.push(WriteOp::ArrayRemove { field: field.to_string(), values: removed });
            ops.push(WriteOp::ArrayUnion { field: field.to_string(), values: added });
        }
    }
    Ok(ops)
}

pub fn add_shared_packing(
    data: &mut TripData,
    name: &str,
    category: &str,
    added_by: &str,
    now: DateTime<Utc>,
) -> DomainResult<(SharedPackingItem, WriteOp)> {
    let name = required(name, "item name")?;
    let category = if category.trim().is_empty() { DEFAULT_PACKING_CATEGORY.to_string() } else { category.trim().to_string() };
    let shared = data.interactive_packing.get_or_insert_with(Vec::new);
    let duplicate = shared
        .iter()
        .any(|i| i.category == category && i.name.to_lowercase() == name.to_lowercase());
    if duplicate {
        return Err(DomainError::Rejected(format!("{} already on the list", name)));
    }
    let mut item = SharedPackingItem {
        name,
        category,
        added_by: added_by.to_string(),
        checked: false,
        timestamp: timestamp(now),
        raw: None,
    };
    let op = WriteOp::union(Collection::InteractivePacking.field(), &stamp(&mut item)?)?;
    shared.push(item.clone());
    Ok((item, op))
}

/// Replace a shared item with its toggled copy (remove + union in one commit)
pub fn set_shared_packing_checked(data: &mut TripData, index: usize, checked: bool) -> DomainResult<Vec<WriteOp>> {
    let item = data
        .interactive_packing
        .as_mut()
        .and_then(|items| items.get_mut(index))
        .ok_or_else(|| DomainError::NotFound(format!("shared packing item #{}", index)))?;
    if item.checked == checked {
        return Ok(Vec::new());
    }
    let before = item.stored_value()?;
    item.checked = checked;
    replace_ops(Collection::InteractivePacking.field(), item, &["checked"], before)
}

pub fn remove_shared_packing(data: &mut TripData, index: usize) -> DomainResult<WriteOp> {
    let item = take_at(&mut data.interactive_packing, index, "shared packing item")?;
    WriteOp::remove(Collection::InteractivePacking.field(), &item)
}

// ========================
// Family board
// ========================

pub fn post_bulletin(data: &mut TripData, author: &str, message: &str, now: DateTime<Utc>) -> DomainResult<WriteOp> {
    let mut post = BulletinPost {
        author: required(author, "author").unwrap_or_else(|_| "אנונימי".to_string()),
        message: required(message, "message")?,
        timestamp: timestamp(now),
        raw: None,
    };
    let op = WriteOp::union(Collection::BulletinBoard.field(), &stamp(&mut post)?)?;
    data.bulletin_board.get_or_insert_with(Vec::new).push(post);
    Ok(op)
}

pub fn delete_bulletin(data: &mut TripData, index: usize) -> DomainResult<WriteOp> {
    let post = take_at(&mut data.bulletin_board, index, "bulletin post")?;
    WriteOp::remove(Collection::BulletinBoard.field(), &post)
}

pub fn add_memory(
    data: &mut TripData,
    author: &str,
    text: &str,
    day: Option<u32>,
    now: DateTime<Utc>,
) -> DomainResult<WriteOp> {
    let mut memory = Memory {
        author: required(author, "author").unwrap_or_else(|_| "אנונימי".to_string()),
        text: required(text, "memory")?,
        day,
        timestamp: timestamp(now),
        raw: None,
    };
    let op = WriteOp::union(Collection::FamilyMemories.field(), &stamp(&mut memory)?)?;
    data.family_memories.get_or_insert_with(Vec::new).push(memory);
    Ok(op)
}

// ========================
// Photos
// ========================

fn photos_mut(data: &mut TripData, category: UploadCategory) -> DomainResult<&mut Option<Vec<Photo>>> {
    match category {
        UploadCategory::Album => Ok(&mut data.photo_album),
        UploadCategory::Packing => Ok(&mut data.packing_photos),
        UploadCategory::Luggage => Err(DomainError::InvalidInput("luggage photos live on luggage records".to_string())),
    }
}

/// Record an uploaded photo. Local (blob URL) photos are kept for this tab
/// only and produce no write.
pub fn add_photo(data: &mut TripData, category: UploadCategory, mut photo: Photo) -> DomainResult<Option<WriteOp>> {
    let collection = category
        .collection()
        .ok_or_else(|| DomainError::InvalidInput("no photo list for category".to_string()))?;
    let op = if photo.is_local {
        None
    } else {
        Some(WriteOp::union(collection.field(), &stamp(&mut photo)?)?)
    };
    photos_mut(data, category)?.get_or_insert_with(Vec::new).push(photo);
    Ok(op)
}

/// Remove a photo; returns it (for storage cleanup) and the write, if any
pub fn delete_photo(
    data: &mut TripData,
    category: UploadCategory,
    index: usize,
) -> DomainResult<(Photo, Option<WriteOp>)> {
    let collection = category
        .collection()
        .ok_or_else(|| DomainError::InvalidInput("no photo list for category".to_string()))?;
    let photo = take_at(photos_mut(data, category)?, index, "photo")?;
    let op = if photo.is_local { None } else { Some(WriteOp::remove(collection.field(), &photo)?) };
    Ok((photo, op))
}

// ========================
// Luggage
// ========================

pub fn add_luggage(
    data: &mut TripData,
    name: &str,
    owner: &str,
    items: &str,
    now: DateTime<Utc>,
) -> DomainResult<WriteOp> {
    let mut luggage = Luggage {
        name: required(name, "luggage name")?,
        owner: owner.trim().to_string(),
        items: items
            .split([',', '\n'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        photo_url: None,
        analysis: None,
        timestamp: timestamp(now),
        raw: None,
    };
    let op = WriteOp::union(Collection::Luggage.field(), &stamp(&mut luggage)?)?;
    data.luggage_data.get_or_insert_with(Vec::new).push(luggage);
    Ok(op)
}

pub fn remove_luggage(data: &mut TripData, index: usize) -> DomainResult<WriteOp> {
    let luggage = take_at(&mut data.luggage_data, index, "luggage")?;
    WriteOp::remove(Collection::Luggage.field(), &luggage)
}

/// Attach a photo and AI analysis to `bag`, wherever it sits in the list now
pub fn attach_luggage_analysis(
    data: &mut TripData,
    bag: &Luggage,
    photo_url: Option<String>,
    analysis: &str,
) -> DomainResult<Vec<WriteOp>> {
    let luggage = data
        .luggage_data
        .as_mut()
        .and_then(|items| items.iter_mut().find(|l| l.same_bag(bag)))
        .ok_or_else(|| DomainError::NotFound(format!("luggage {}", bag.name)))?;
    let before = luggage.stored_value()?;
    if photo_url.is_some() {
        luggage.photo_url = photo_url;
    }
    luggage.analysis = Some(analysis.to_string());
    replace_ops(Collection::Luggage.field(), luggage, &["photoUrl", "analysis"], before)
}

// ========================
// Chat & plans
// ========================

pub fn push_chat(data: &mut TripData, role: ChatRole, text: &str, now: DateTime<Utc>) -> DomainResult<WriteOp> {
    let mut message = ChatMessage { role, text: text.to_string(), timestamp: timestamp(now), raw: None };
    let op = WriteOp::union(Collection::ChatMessages.field(), &stamp(&mut message)?)?;
    data.chat_messages.get_or_insert_with(Vec::new).push(message);
    Ok(op)
}

pub fn clear_chat(data: &mut TripData) -> WriteOp {
    data.chat_messages = Some(Vec::new());
    WriteOp::SetField { path: vec![Collection::ChatMessages.field().to_string()], value: Value::Array(Vec::new()) }
}

pub fn save_custom_plan(
    data: &mut TripData,
    title: &str,
    content: &str,
    day: Option<u32>,
    now: DateTime<Utc>,
) -> DomainResult<WriteOp> {
    let mut plan = CustomPlan {
        title: required(title, "plan title")?,
        content: required(content, "plan content")?,
        day,
        timestamp: timestamp(now),
        raw: None,
    };
    let op = WriteOp::union(Collection::CustomPlans.field(), &stamp(&mut plan)?)?;
    data.custom_plans.get_or_insert_with(Vec::new).push(plan);
    Ok(op)
}

pub fn delete_custom_plan(data: &mut TripData, index: usize) -> DomainResult<WriteOp> {
    let plan = take_at(&mut data.custom_plans, index, "custom plan")?;
    WriteOp::remove(Collection::CustomPlans.field(), &plan)
}

// ========================
// Activities
// ========================

/// Append AI-generated activities that are not already known
pub fn add_generated_activities(
    data: &mut TripData,
    generated: Vec<Activity>,
    now: DateTime<Utc>,
) -> DomainResult<(Vec<Activity>, Option<WriteOp>)> {
    let existing = data.activities_data.get_or_insert_with(Vec::new);
    let added = merge_generated(existing, generated, now.timestamp_millis());
    if added.is_empty() {
        return Ok((added, None));
    }
    let op = WriteOp::ArrayUnion {
        field: Collection::Activities.field().to_string(),
        values: added.iter().map(to_json).collect::<DomainResult<_>>()?,
    };
    Ok((added, Some(op)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packing::PackingProgress;
    use chrono::TimeZone;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 14, 9, 30, 0).unwrap()
    }

    fn packing_data() -> TripData {
        let mut list = BTreeMap::new();
        list.insert(
            "בגדים".to_string(),
            vec![
                PackingItem { name: "מעיל".into(), checked: false },
                PackingItem { name: "כובע".into(), checked: true },
            ],
        );
        TripData { packing_list_data: Some(list), ..Default::default() }
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(timestamp(now()), "2025-07-14T09:30:00.000Z");
        assert_eq!(display_time("not a time"), "not a time");
    }

    #[test]
    fn test_toggle_packing_updates_progress_and_write() {
        let mut data = packing_data();
        let op = set_packing_checked(&mut data, "בגדים", 0, true).unwrap();
        let list = data.packing_list_data.as_ref().unwrap();
        assert_eq!(PackingProgress::of(list, &[]).percent, 100);
        match op {
            WriteOp::SetField { path, value } => {
                assert_eq!(path, vec!["packingListData".to_string(), "בגדים".to_string()]);
                assert_eq!(value[0], json!({ "name": "מעיל", "checked": true }));
            }
            other => panic!("unexpected op {:?}", other),
        }
        assert!(set_packing_checked(&mut data, "בגדים", 9, true).is_err());
        assert!(set_packing_checked(&mut data, "אין", 0, true).is_err());
    }

    #[test]
    fn test_shared_packing_lifecycle() {
        let mut data = packing_data();
        let (item, op) = add_shared_packing(&mut data, " משקפת ", "", "אבא", now()).unwrap();
        assert_eq!(item.name, "משקפת");
        assert_eq!(item.category, "כללי");
        assert!(matches!(op, WriteOp::ArrayUnion { .. }));
        assert!(add_shared_packing(&mut data, "משקפת", "כללי", "אמא", now()).is_err());
        assert!(add_shared_packing(&mut data, "  ", "כללי", "אמא", now()).is_err());

        let ops = set_shared_packing_checked(&mut data, 0, true).unwrap();
        assert_eq!(ops.len(), 2);
        assert!(data.interactive_packing.as_ref().unwrap()[0].checked);
        assert!(set_shared_packing_checked(&mut data, 0, true).unwrap().is_empty());

        let progress = PackingProgress::of(
            data.packing_list_data.as_ref().unwrap(),
            data.interactive_packing.as_ref().unwrap(),
        );
        assert_eq!((progress.checked, progress.total), (2, 3));

        let ops = reset_packing(&mut data).unwrap();
        assert_eq!(ops.len(), 3);
        assert!(data.interactive_packing.as_ref().unwrap().iter().all(|i| !i.checked));

        remove_shared_packing(&mut data, 0).unwrap();
        assert!(data.interactive_packing.as_ref().unwrap().is_empty());
        assert!(remove_shared_packing(&mut data, 0).is_err());
    }

    #[test]
    fn test_bulletin_and_memories() {
        let mut data = TripData::default();
        assert!(post_bulletin(&mut data, "נועה", "   ", now()).is_err());
        post_bulletin(&mut data, "", "נפגשים בלובי ב-9", now()).unwrap();
        let post = &data.bulletin_board.as_ref().unwrap()[0];
        assert_eq!(post.author, "אנונימי");

        let op = delete_bulletin(&mut data, 0).unwrap();
        match op {
            WriteOp::ArrayRemove { field, values } => {
                assert_eq!(field, "bulletinBoard");
                assert_eq!(values[0]["message"], "נפגשים בלובי ב-9");
            }
            other => panic!("unexpected op {:?}", other),
        }

        add_memory(&mut data, "סבתא", "השעון הפרחוני!", Some(2), now()).unwrap();
        assert_eq!(data.family_memories.as_ref().unwrap()[0].day, Some(2));
    }

    #[test]
    fn test_local_photos_are_not_persisted() {
        let mut data = TripData::default();
        let remote = Photo { url: "https://x/a.jpg".into(), ..Default::default() };
        let local = Photo { url: "blob:abc".into(), is_local: true, ..Default::default() };
        assert!(add_photo(&mut data, UploadCategory::Album, remote).unwrap().is_some());
        assert!(add_photo(&mut data, UploadCategory::Album, local).unwrap().is_none());
        assert_eq!(data.photo_album.as_ref().unwrap().len(), 2);
        assert!(add_photo(&mut data, UploadCategory::Luggage, Photo::default()).is_err());

        let (photo, op) = delete_photo(&mut data, UploadCategory::Album, 1).unwrap();
        assert!(photo.is_local);
        assert!(op.is_none());
        let (_, op) = delete_photo(&mut data, UploadCategory::Album, 0).unwrap();
        assert!(op.is_some());
    }

    #[test]
    fn test_luggage() {
        let mut data = TripData::default();
        add_luggage(&mut data, "מזוודה כחולה", "דני", "חולצות, מכנסיים\nנעליים,", now()).unwrap();
        let luggage = &data.luggage_data.as_ref().unwrap()[0];
        assert_eq!(luggage.items, vec!["חולצות", "מכנסיים", "נעליים"]);

        let bag = luggage.clone();
        let ops = attach_luggage_analysis(&mut data, &bag, Some("https://x/bag.jpg".into()), "חסר מעיל").unwrap();
        assert_eq!(ops.len(), 2);
        let luggage = &data.luggage_data.as_ref().unwrap()[0];
        assert_eq!(luggage.analysis.as_deref(), Some("חסר מעיל"));
        assert!(remove_luggage(&mut data, 3).is_err());
    }

    #[test]
    fn test_analysis_follows_the_bag_not_the_index() {
        let mut data = TripData::default();
        add_luggage(&mut data, "תיק גב", "נועה", "", now()).unwrap();
        add_luggage(&mut data, "מזוודה אדומה", "אבא", "", now() + chrono::Duration::seconds(5)).unwrap();
        let bag = data.luggage_data.as_ref().unwrap()[1].clone();

        // an earlier bag is removed while the analysis is running
        remove_luggage(&mut data, 0).unwrap();
        attach_luggage_analysis(&mut data, &bag, None, "הכל ארוז").unwrap();
        let luggage = data.luggage_data.as_ref().unwrap();
        assert_eq!(luggage[0].name, "מזוודה אדומה");
        assert_eq!(luggage[0].analysis.as_deref(), Some("הכל ארוז"));

        remove_luggage(&mut data, 0).unwrap();
        assert!(matches!(
            attach_luggage_analysis(&mut data, &bag, None, "x"),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn test_chat_and_plans() {
        let mut data = TripData::default();
        push_chat(&mut data, ChatRole::User, "שלום", now()).unwrap();
        push_chat(&mut data, ChatRole::Assistant, "היי!", now()).unwrap();
        assert_eq!(data.chat_messages.as_ref().unwrap().len(), 2);
        clear_chat(&mut data);
        assert_eq!(data.chat_messages, Some(vec![]));

        save_custom_plan(&mut data, "יום גשום", "מוזיאון", Some(3), now()).unwrap();
        assert!(save_custom_plan(&mut data, "", "x", None, now()).is_err());
        delete_custom_plan(&mut data, 0).unwrap();
        assert!(data.custom_plans.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_generated_activities() {
        let mut data = TripData::default();
        let generated = vec![
            Activity { name: "Bains des Pâquis".into(), ..Default::default() },
            Activity { name: "bains des pâquis".into(), ..Default::default() },
        ];
        let (added, op) = add_generated_activities(&mut data, generated, now()).unwrap();
        assert_eq!(added.len(), 1);
        assert!(op.is_some());
        let (added, op) = add_generated_activities(&mut data, vec![], now()).unwrap();
        assert!(added.is_empty() && op.is_none());
    }

    fn removed_value(op: WriteOp) -> Value {
        match op {
            WriteOp::ArrayRemove { mut values, .. } => values.remove(0),
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_removal_sends_the_stored_value() {
        let photo = json!({ "url": "u", "caption": "c", "uploadedBy": "a", "timestamp": "t" });
        let post = json!({ "author": "אמא", "message": "ארוחת ערב ב-7", "timestamp": 1720944000000u64, "pinned": true });
        let bag = json!({ "name": "מזוודה", "items": ["גרביים"], "timestamp": "t", "color": "כחול" });
        let plan = json!({ "title": "יום גשום", "content": "מוזיאון", "day": "3" });
        let mut data = TripData::from_json(json!({
            "photoAlbum": [photo.clone()],
            "bulletinBoard": [post.clone()],
            "luggageData": [bag.clone()],
            "customPlans": [plan.clone()]
        }));

        let (_, op) = delete_photo(&mut data, UploadCategory::Album, 0).unwrap();
        assert_eq!(removed_value(op.unwrap()), photo);
        assert_eq!(removed_value(delete_bulletin(&mut data, 0).unwrap()), post);
        assert_eq!(removed_value(remove_luggage(&mut data, 0).unwrap()), bag);
        assert_eq!(removed_value(delete_custom_plan(&mut data, 0).unwrap()), plan);
    }

    #[test]
    fn test_replacing_a_record_keeps_its_stored_fields() {
        let stored = json!({ "name": "משקפת", "category": "כללי", "checked": false, "timestamp": 5, "qty": 2 });
        let mut data = TripData::from_json(json!({ "interactivePacking": [stored.clone()] }));

        let ops = set_shared_packing_checked(&mut data, 0, true).unwrap();
        let mut expected = stored.clone();
        expected["checked"] = json!(true);
        assert_eq!(ops[0], WriteOp::ArrayRemove { field: "interactivePacking".into(), values: vec![stored] });
        assert_eq!(ops[1], WriteOp::ArrayUnion { field: "interactivePacking".into(), values: vec![expected.clone()] });

        // a second change removes what the first one wrote
        let ops = set_shared_packing_checked(&mut data, 0, false).unwrap();
        assert_eq!(ops[0], WriteOp::ArrayRemove { field: "interactivePacking".into(), values: vec![expected] });
        assert_eq!(removed_value(remove_shared_packing(&mut data, 0).unwrap())["checked"], json!(false));
    }

    #[test]
    fn test_new_records_are_removed_as_written() {
        let mut data = TripData::default();
        let written = match post_bulletin(&mut data, "דני", "יוצאים ב-8", now()).unwrap() {
            WriteOp::ArrayUnion { mut values, .. } => values.remove(0),
            other => panic!("unexpected op {:?}", other),
        };
        assert_eq!(removed_value(delete_bulletin(&mut data, 0).unwrap()), written);

        let remote = Photo { url: "https://x/a.jpg".into(), ..Default::default() };
        add_photo(&mut data, UploadCategory::Album, remote).unwrap();
        let (_, op) = delete_photo(&mut data, UploadCategory::Album, 0).unwrap();
        assert!(removed_value(op.unwrap()).get("isLocal").is_none());
    }

    #[test]
    fn test_packing_rewrite_keeps_undecodable_entries() {
        let mut data = TripData::from_json(json!({
            "packingListData": {
                "בגדים": [
                    { "name": "hat", "checked": false },
                    { "name": "coat", "checked": "yes-ish", "qty": 2 },
                    "socks",
                    { "name": "scarf", "checked": true, "color": "red" }
                ],
                "notes": "bring adapters"
            }
        }));
        assert_eq!(data.packing_list_data.as_ref().unwrap()["בגדים"].len(), 2);

        // decoded index 1 is the fourth stored entry
        let op = set_packing_checked(&mut data, "בגדים", 1, false).unwrap();
        let expected = json!([
            { "name": "hat", "checked": false },
            { "name": "coat", "checked": "yes-ish", "qty": 2 },
            "socks",
            { "name": "scarf", "checked": false, "color": "red" }
        ]);
        assert_eq!(op, WriteOp::SetField { path: vec!["packingListData".into(), "בגדים".into()], value: expected });

        set_packing_checked(&mut data, "בגדים", 0, true).unwrap();
        let ops = reset_packing(&mut data).unwrap();
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            WriteOp::SetField { path, value } => {
                assert_eq!(path, &vec!["packingListData".to_string(), "בגדים".to_string()]);
                assert_eq!(value.as_array().unwrap().len(), 4);
                assert_eq!(value[0]["checked"], json!(false));
                assert_eq!(value[1]["qty"], json!(2));
                assert_eq!(value[2], json!("socks"));
            }
            other => panic!("unexpected op {:?}", other),
        }
    }
}
