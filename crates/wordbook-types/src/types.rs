use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// One saved term. Field names match the persisted JSON and the CSV columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyEntry {
    #[serde(deserialize_with = "loose_string")]
    pub term: String,
    #[serde(deserialize_with = "loose_string")]
    pub gloss: String,
    #[serde(deserialize_with = "loose_string")]
    pub pos: String,
    #[serde(deserialize_with = "loose_string")]
    pub source_lang: String,
    #[serde(deserialize_with = "loose_string")]
    pub target_lang: String,
    #[serde(deserialize_with = "loose_string")]
    pub example: String,
    #[serde(deserialize_with = "loose_string")]
    pub example_translation: String,
    #[serde(deserialize_with = "loose_string")]
    pub page_title: String,
    #[serde(deserialize_with = "loose_string")]
    pub page_url: String,
    /// Capture time, milliseconds since the Unix epoch
    #[serde(rename = "ts", deserialize_with = "loose_timestamp")]
    pub timestamp: i64,
}

/// Scalar as it may appear in a hand-edited or older list
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

/// Null reads as empty, numbers and booleans as their text
fn loose_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        None => String::new(),
        Some(Scalar::Int(n)) => n.to_string(),
        Some(Scalar::Float(n)) => n.to_string(),
        Some(Scalar::Bool(b)) => b.to_string(),
        Some(Scalar::Text(s)) => s,
    })
}

/// Unreadable timestamps become 0
fn loose_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Int(n)) => n,
        Some(Scalar::Float(n)) => n as i64,
        Some(Scalar::Text(s)) => s.trim().parse().unwrap_or(0),
        Some(Scalar::Bool(_)) | None => 0,
    })
}

/// Result of one lookup. A card becomes a vocabulary entry unchanged when added.
pub type Card = VocabularyEntry;

impl VocabularyEntry {
    /// Uniqueness key used by the vocabulary store
    pub fn dedup_key(&self) -> String {
        format!("{}__{}", self.term, self.gloss)
    }
}

/// Where the selected text was captured
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContext {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Screen position of a popup's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub left: f64,
    pub top: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PopupId(Uuid);

impl PopupId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, enough to address a popup from the console
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for PopupId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PopupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PopupContent {
    Loading(String),
    Card(Card),
    /// "Couldn't parse." with a preview of the raw completion
    Unparsable(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    /// Highlighted text (X11/Wayland primary selection)
    Selection,
    Clipboard,
    Websocket,
    Manual,
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Pointer-up equivalent: a host surface reported new selected text
    SelectionChanged {
        text: String,
        source: TextSource,
    },
    TranslateRequested,
    ExportRequested,
    /// Dismiss hotkey: forget the cached selection
    DismissRequested,
    UiEvent(UiEvent),
    ShowPopup {
        id: PopupId,
        anchor: Anchor,
        content: PopupContent,
    },
    UpdatePopup {
        id: PopupId,
        content: PopupContent,
    },
    PopupStatus {
        id: PopupId,
        status: String,
    },
    Toast(String),
    BackendReady,
}

/// Card button presses and console input. Buttons carry their card so the
/// backend never needs to know which popups are open.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Add { popup: PopupId, card: Card },
    Copy(Card),
    Export,
    /// Text typed at the console instead of selected
    Translate(String),
}
