use crate::error::{AnkiError, AnkiResult};
use crate::types::Flashcard;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

pub const ANKI_CONNECT_VERSION: u8 = 6;

/// The two AnkiConnect actions the importer needs.
#[allow(async_fn_in_trait)]
pub trait FlashcardApi {
    async fn store_media_file(&self, filename: &str, data: &str) -> AnkiResult<Value>;

    /// Creates one note and returns the id Anki assigned to it.
    async fn add_note(&self, note: &NewNote) -> AnkiResult<Value>;
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    pub deck_name: String,
    pub model_name: String,
    pub fields: NoteFields,
    pub options: NoteOptions,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NoteFields {
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteOptions {
    pub allow_duplicate: bool,
}

impl NewNote {
    pub fn from_card(deck: &str, model: &str, card: Flashcard) -> Self {
        Self {
            deck_name: deck.to_string(),
            model_name: model.to_string(),
            fields: NoteFields {
                front: card.front,
                back: card.back,
            },
            options: NoteOptions {
                allow_duplicate: false,
            },
            tags: card.tags,
        }
    }
}

pub fn request_body(action: &str, params: Value) -> Value {
    json!({
        "action": action,
        "params": params,
        "version": ANKI_CONNECT_VERSION,
    })
}

/// Checks the `{result, error}` envelope and unwraps `result`.
pub fn parse_response(response: Value) -> AnkiResult<Value> {
    let Value::Object(mut fields) = response else {
        return Err(AnkiError::Protocol(
            "response is not a JSON object".to_string(),
        ));
    };

    if fields.len() != 2 {
        return Err(AnkiError::Protocol(
            "response has an unexpected number of fields".to_string(),
        ));
    }
    if !fields.contains_key("error") {
        return Err(AnkiError::Protocol(
            "response is missing required error field".to_string(),
        ));
    }
    if !fields.contains_key("result") {
        return Err(AnkiError::Protocol(
            "response is missing required result field".to_string(),
        ));
    }

    match fields.remove("error") {
        Some(Value::Null) | None => Ok(fields.remove("result").unwrap_or(Value::Null)),
        Some(Value::String(message)) => Err(AnkiError::Warning(message)),
        Some(other) => Err(AnkiError::Warning(other.to_string())),
    }
}

pub struct AnkiConnect {
    client: reqwest::Client,
    endpoint: String,
}

impl AnkiConnect {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    async fn invoke(&self, action: &str, params: Value) -> AnkiResult<Value> {
        debug!("AnkiConnect {}", action);
        let response: Value = self
            .client
            .post(&self.endpoint)
            .json(&request_body(action, params))
            .send()
            .await?
            .json()
            .await?;

        parse_response(response)
    }
}

impl FlashcardApi for AnkiConnect {
    async fn store_media_file(&self, filename: &str, data: &str) -> AnkiResult<Value> {
        self.invoke(
            "storeMediaFile",
            json!({ "filename": filename, "data": data }),
        )
        .await
    }

    async fn add_note(&self, note: &NewNote) -> AnkiResult<Value> {
        self.invoke("addNote", json!({ "note": note })).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_note_request_shape() {
        let card = Flashcard {
            front: "Hello".to_string(),
            back: "Hallo[sound:hallo.mp3]".to_string(),
            tags: vec!["hallo".to_string()],
        };
        let note = NewNote::from_card("DW Nicos Weg A1", "Basic", card);
        let body = request_body("addNote", json!({ "note": note }));

        assert_eq!(
            body,
            json!({
                "action": "addNote",
                "version": 6,
                "params": {
                    "note": {
                        "deckName": "DW Nicos Weg A1",
                        "modelName": "Basic",
                        "fields": { "Front": "Hello", "Back": "Hallo[sound:hallo.mp3]" },
                        "options": { "allowDuplicate": false },
                        "tags": ["hallo"]
                    }
                }
            })
        );
    }

    #[test]
    fn test_successful_response() {
        let result = parse_response(json!({ "result": 1496198395707u64, "error": null })).unwrap();
        assert_eq!(result, json!(1496198395707u64));
    }

    #[test]
    fn test_duplicate_is_warning() {
        let err = parse_response(json!({
            "result": null,
            "error": "cannot create note because it is a duplicate"
        }))
        .unwrap_err();

        assert!(err.is_warning());
        assert_eq!(
            err.to_string(),
            "cannot create note because it is a duplicate"
        );
    }

    #[test]
    fn test_missing_error_is_protocol_error() {
        let err = parse_response(json!({ "result": null, "status": "ok" })).unwrap_err();
        assert!(matches!(err, AnkiError::Protocol(_)));
        assert!(!err.is_warning());
    }

    #[test]
    fn test_field_count_checked() {
        let err = parse_response(json!({ "result": 1, "error": null, "extra": true })).unwrap_err();
        assert!(matches!(err, AnkiError::Protocol(_)));

        let err = parse_response(json!({ "result": 1 })).unwrap_err();
        assert!(matches!(err, AnkiError::Protocol(_)));

        let err = parse_response(json!([1, 2])).unwrap_err();
        assert!(matches!(err, AnkiError::Protocol(_)));
    }
}
