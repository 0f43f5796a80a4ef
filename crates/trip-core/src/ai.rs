//! Generative AI Glue
//!
//! Builds Hebrew prompts from trip state, shapes `generateContent` requests,
//! pulls text (and JSON, when a structured reply was asked for) back out,
//! and turns failures into friendly copy.

use std::sync::OnceLock;

use base64::Engine;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Activity, ChatMessage, ChatRole, DayEntry, TripData};
use crate::{DomainError, DomainResult};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Chat turns sent along with a new message
pub const CHAT_HISTORY_LIMIT: usize = 10;

const API_ROOT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const TRIP_CONTEXT: &str = "אתה מדריך טיולים מנוסה שעוזר למשפחה ישראלית לתכנן טיול לז'נבה ולסביבתה. \
ענה תמיד בעברית, בצורה ידידותית, מעשית ותמציתית. התחשב בילדים, בתחבורה ציבורית ובתקציב משפחתי.";

pub fn endpoint(model: &str, api_key: &str) -> String {
    format!("{}/{}:generateContent?key={}", API_ROOT, model, api_key)
}

// ========================
// Request / response shapes
// ========================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// Image bytes as an inline base64 part
    pub fn image(mime_type: &str, bytes: &[u8]) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.to_string(),
                data: base64::engine::general_purpose::STANDARD.encode(bytes),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self { role: Some("user".to_string()), parts }
    }

    pub fn model(text: &str) -> Self {
        Self { role: Some("model".to_string()), parts: vec![Part::text(text)] }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateRequest {
    /// Single user turn made of `parts`
    pub fn single(parts: Vec<Part>) -> Self {
        Self { contents: vec![Content::user(parts)], generation_config: None }
    }

    /// Ask for a JSON reply (lower temperature, room for a list)
    pub fn structured(prompt: String) -> Self {
        Self {
            contents: vec![Content::user(vec![Part::text(prompt)])],
            generation_config: Some(GenerationConfig { temperature: 0.4, max_output_tokens: 4096 }),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate
    pub fn text(&self) -> DomainResult<String> {
        let text: String = self
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| match part {
                        Part::Text { text } => Some(text.as_str()),
                        Part::InlineData { .. } => None,
                    })
                    .collect()
            })
            .unwrap_or_default();
        if text.trim().is_empty() {
            Err(DomainError::Upstream("empty response".to_string()))
        } else {
            Ok(text)
        }
    }
}

// ========================
// Prompts
// ========================

fn itinerary_outline(data: &TripData) -> String {
    data.itinerary_data
        .as_ref()
        .map(|days| {
            days.iter()
                .map(|d| format!("- יום {} ({}): {}", d.day_index, d.day_name, d.title))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

/// Free-text question about the trip
pub fn trip_question_prompt(question: &str, data: &TripData) -> DomainResult<String> {
    let question = question.trim();
    if question.is_empty() {
        return Err(DomainError::Rejected("empty question".to_string()));
    }
    let outline = itinerary_outline(data);
    let mut prompt = String::from(TRIP_CONTEXT);
    if !outline.is_empty() {
        prompt.push_str("\n\nמסלול הטיול הנוכחי:\n");
        prompt.push_str(&outline);
    }
    prompt.push_str("\n\nשאלת המשפחה: ");
    prompt.push_str(question);
    Ok(prompt)
}

/// Suggestions for one itinerary day
pub fn day_plan_prompt(day: &DayEntry, data: &TripData) -> String {
    let planned = day
        .main_plan
        .items
        .iter()
        .filter_map(|item| {
            item.activity_id
                .as_deref()
                .and_then(|id| data.find_activity(id))
                .map(|a| a.name.clone())
                .or_else(|| item.description.clone())
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{}\n\nיום {} ({}, {}): \"{}\".\nהתוכנית הנוכחית: {}.\n\
הצע שיפורים לתוכנית היום: סדר מומלץ, זמני נסיעה, מקומות לאכול ופעילות חלופית למקרה של גשם.",
        TRIP_CONTEXT,
        day.day_index,
        day.day_name,
        day.date,
        day.title,
        if planned.is_empty() { "עדיין אין פעילויות" } else { planned.as_str() }
    )
}

/// Ask for `count` new activities as a JSON array
pub fn activity_generation_prompt(existing: &[Activity], category: Option<&str>, count: usize) -> String {
    let known = existing.iter().map(|a| a.name.as_str()).collect::<Vec<_>>().join(", ");
    let focus = match category {
        Some(category) => format!("בקטגוריה \"{}\" ", category),
        None => String::new(),
    };
    format!(
        "{}\n\nהצע {} פעילויות חדשות {}בז'נבה ובסביבתה שאינן ברשימה הזו: {}.\n\
החזר אך ורק מערך JSON, ללא טקסט נוסף, שבו לכל פעילות השדות: \
\"name\", \"category\", \"time\" (זמן נסיעה בדקות ממרכז העיר, מספר), \"cost\", \"transport\", \
\"address\", \"description\", \"lat\", \"lon\", \"link\".",
        TRIP_CONTEXT, count, focus, known
    )
}

/// Vision prompt for a luggage photo
pub fn luggage_analysis_parts(owner: &str, mime_type: &str, bytes: &[u8]) -> Vec<Part> {
    vec![
        Part::text(format!(
            "{}\n\nזו תמונה של המזוודה של {}. זהה מה כבר ארוז, מה חסר לטיול משפחתי בז'נבה, \
והצע איך לארוז בצורה יעילה יותר. ענה ברשימה קצרה.",
            TRIP_CONTEXT, owner
        )),
        Part::image(mime_type, bytes),
    ]
}

/// Multi-turn chat request: context, recent history, new message
pub fn chat_request(history: &[ChatMessage], message: &str) -> GenerateRequest {
    let mut contents = vec![
        Content::user(vec![Part::text(TRIP_CONTEXT)]),
        Content::model("בשמחה! במה אפשר לעזור בתכנון הטיול?"),
    ];
    let recent = &history[history.len().saturating_sub(CHAT_HISTORY_LIMIT)..];
    // the primer ends on a model turn, so the window opens on a user turn
    let start = recent.iter().position(|t| t.role == ChatRole::User).unwrap_or(recent.len());
    for turn in &recent[start..] {
        contents.push(match turn.role {
            ChatRole::User => Content::user(vec![Part::text(turn.text.clone())]),
            ChatRole::Assistant => Content::model(&turn.text),
        });
    }
    contents.push(Content::user(vec![Part::text(message)]));
    GenerateRequest { contents, generation_config: None }
}

// ========================
// Structured replies
// ========================

fn fenced_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```(?:json|JSON)?\s*([\s\S]*?)```").expect("valid regex"))
}

fn array_span() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[[\s\S]*\]").expect("valid regex"))
}

/// Find a JSON array in a free-form reply: whole text, fenced block, then
/// the widest `[ ... ]` span
pub fn extract_json_array(text: &str) -> Option<Vec<Value>> {
    let as_array = |s: &str| match serde_json::from_str::<Value>(s.trim()) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    };
    as_array(text)
        .or_else(|| {
            fenced_block()
                .captures_iter(text)
                .filter_map(|c| c.get(1))
                .find_map(|m| as_array(m.as_str()))
        })
        .or_else(|| array_span().find(text).and_then(|m| as_array(m.as_str())))
}

/// Activities from a generation reply; unusable entries are skipped
pub fn parse_generated_activities(text: &str) -> DomainResult<Vec<Activity>> {
    let items = extract_json_array(text)
        .ok_or_else(|| DomainError::Upstream("no JSON array in response".to_string()))?;
    let activities: Vec<Activity> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<Activity>(item).ok())
        .filter(|a| !a.name.trim().is_empty())
        .collect();
    if activities.is_empty() {
        return Err(DomainError::Upstream("no usable activities in response".to_string()));
    }
    Ok(activities)
}

// ========================
// Errors
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiErrorKind {
    Quota,
    Permission,
    Network,
    Other,
}

impl AiErrorKind {
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));
        if has(&["quota", "429", "resource_exhausted", "rate limit"]) {
            AiErrorKind::Quota
        } else if has(&["permission", "403", "401", "api key", "api_key", "unauthenticated"]) {
            AiErrorKind::Permission
        } else if has(&["network", "failed to fetch", "fetch", "timeout", "timed out", "offline", "connection"]) {
            AiErrorKind::Network
        } else {
            AiErrorKind::Other
        }
    }

    pub fn friendly_message(&self) -> &'static str {
        match self {
            AiErrorKind::Quota => "הגענו למכסת השימוש בבינה המלאכותית. נסו שוב בעוד כמה דקות.",
            AiErrorKind::Permission => "אין הרשאה לשירות הבינה המלאכותית. בדקו את הגדרות המפתח.",
            AiErrorKind::Network => "בעיית תקשורת. בדקו את החיבור לאינטרנט ונסו שוב.",
            AiErrorKind::Other => "משהו השתבש בקבלת תשובה. נסו שוב.",
        }
    }
}

/// Escape text for insertion into markup
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let request = GenerateRequest::single(vec![Part::text("שלום"), Part::image("image/png", &[1, 2, 3])]);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "שלום");
        assert_eq!(body["contents"][0]["parts"][1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(body["contents"][0]["parts"][1]["inline_data"]["data"], "AQID");
        assert!(body.get("generationConfig").is_none());

        let structured = serde_json::to_value(GenerateRequest::structured("x".into())).unwrap();
        assert_eq!(structured["generationConfig"]["maxOutputTokens"], 4096);
    }

    #[test]
    fn test_response_text() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "role": "model", "parts": [ { "text": "שלום " }, { "text": "עולם" } ] } }]
        }))
        .unwrap();
        assert_eq!(response.text().unwrap(), "שלום עולם");

        let empty: GenerateResponse = serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert!(empty.text().is_err());
    }

    #[test]
    fn test_extract_json_variants() {
        assert_eq!(extract_json_array("[1, 2]").unwrap().len(), 2);
        let fenced = "הנה ההצעות:\n```json\n[{\"name\": \"a\"}]\n```\nבהנאה!";
        assert_eq!(extract_json_array(fenced).unwrap()[0]["name"], "a");
        let loose = "בטח! [{\"name\": \"b\"}, {\"name\": \"c\"}] זהו.";
        assert_eq!(extract_json_array(loose).unwrap().len(), 2);
        assert!(extract_json_array("אין כאן כלום").is_none());
        assert!(extract_json_array("{\"name\": \"x\"}").is_none());
    }

    #[test]
    fn test_parse_generated_activities() {
        let reply = r#"```json
[
  {"name": "Parc des Bastions", "category": "טבע", "time": 10, "cost": "חינם"},
  {"category": "no name"},
  "garbage"
]
```"#;
        let activities = parse_generated_activities(reply).unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].travel_minutes(), Some(10));
        assert!(parse_generated_activities("[]").is_err());
    }

    #[test]
    fn test_error_classification() {
        assert_eq!(AiErrorKind::classify("429 Too Many Requests: quota exceeded"), AiErrorKind::Quota);
        assert_eq!(AiErrorKind::classify("PERMISSION_DENIED"), AiErrorKind::Permission);
        assert_eq!(AiErrorKind::classify("TypeError: Failed to fetch"), AiErrorKind::Network);
        assert_eq!(AiErrorKind::classify("weird"), AiErrorKind::Other);
        assert!(AiErrorKind::Quota.friendly_message().contains("מכסת"));
    }

    #[test]
    fn test_chat_history_is_bounded() {
        let history: Vec<ChatMessage> = (0..25)
            .map(|i| ChatMessage {
                role: if i % 2 == 0 { ChatRole::User } else { ChatRole::Assistant },
                text: format!("msg {}", i),
                ..Default::default()
            })
            .collect();
        let request = chat_request(&history[..24], "מה עושים מחר?");
        // context pair + last 10 turns + new message
        assert_eq!(request.contents.len(), 2 + CHAT_HISTORY_LIMIT + 1);
        assert_eq!(request.contents[2].parts[0], Part::text("msg 14"));
        assert_eq!(request.contents[2].role.as_deref(), Some("user"));
        assert_eq!(request.contents.last().unwrap().parts[0], Part::text("מה עושים מחר?"));
    }

    #[test]
    fn test_chat_window_opens_on_a_user_turn() {
        let history: Vec<ChatMessage> = (0..25)
            .map(|i| ChatMessage {
                role: if i % 2 == 0 { ChatRole::User } else { ChatRole::Assistant },
                text: format!("msg {}", i),
                ..Default::default()
            })
            .collect();
        // the last ten turns start with a model reply (msg 15), which is dropped
        let request = chat_request(&history, "ומה עם גשם?");
        assert_eq!(request.contents.len(), 2 + CHAT_HISTORY_LIMIT - 1 + 1);
        assert_eq!(request.contents[1].role.as_deref(), Some("model"));
        assert_eq!(request.contents[2].parts[0], Part::text("msg 16"));
        assert_eq!(request.contents[2].role.as_deref(), Some("user"));

        let only_replies = vec![ChatMessage { role: ChatRole::Assistant, text: "היי".into(), ..Default::default() }];
        assert_eq!(chat_request(&only_replies, "שלום").contents.len(), 3);
    }

    #[test]
    fn test_prompts() {
        assert!(trip_question_prompt("   ", &TripData::default()).is_err());
        let data = TripData::from_json(json!({
            "itineraryData": [{ "dayIndex": 1, "dayName": "ראשון", "title": "העיר העתיקה",
                "mainPlan": { "title": "", "items": [ { "activityId": "a1" }, { "description": "פיקניק" } ] } }],
            "activitiesData": [{ "id": "a1", "name": "Cathédrale Saint-Pierre" }]
        }));
        let prompt = trip_question_prompt("איפה אוכלים?", &data).unwrap();
        assert!(prompt.contains("העיר העתיקה"));
        assert!(prompt.ends_with("איפה אוכלים?"));

        let day = &data.itinerary_data.as_ref().unwrap()[0];
        let day_prompt = day_plan_prompt(day, &data);
        assert!(day_prompt.contains("Cathédrale Saint-Pierre, פיקניק"));

        let gen = activity_generation_prompt(data.activities_data.as_ref().unwrap(), Some("קפה"), 6);
        assert!(gen.contains("הצע 6 פעילויות"));
        assert!(gen.contains("\"קפה\""));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"a\" & 'b'</b>"), "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;");
    }
}
