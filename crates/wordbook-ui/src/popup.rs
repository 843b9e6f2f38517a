use crossterm::style::Stylize;
use wordbook_types::{Anchor, Card, PopupContent, PopupId};

pub const LOADING_TEXT: &str = "Translating…";
pub const SAVED_TEXT: &str = "Saved ✓";

/// One floating result card
#[derive(Debug, Clone)]
pub struct PopupView {
    pub id: PopupId,
    pub anchor: Anchor,
    pub content: PopupContent,
    pub status: String,
}

impl PopupView {
    pub fn new(id: PopupId, anchor: Anchor, content: PopupContent) -> Self {
        Self {
            id,
            anchor,
            content,
            status: String::new(),
        }
    }

    pub fn card(&self) -> Option<&Card> {
        match &self.content {
            PopupContent::Card(card) => Some(card),
            _ => None,
        }
    }

    /// Plain-text lines, no styling
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "[{}] at ({:.0}, {:.0})",
            self.id, self.anchor.left, self.anchor.top
        )];

        match &self.content {
            PopupContent::Loading(text) => lines.push(text.clone()),
            PopupContent::Card(card) => {
                lines.push(format!("{} ({})", card.term, card.pos));
                lines.push(format!("Meaning: {}", card.gloss));
                lines.push(format!("Example: {}", card.example));
                lines.push(format!("Translation: {}", card.example_translation));
                lines.push(format!("{} — {}", card.page_title, card.page_url));
                let mut actions = "add | copy | export | close".to_string();
                if !self.status.is_empty() {
                    actions.push_str("   ");
                    actions.push_str(&self.status);
                }
                lines.push(actions);
            }
            PopupContent::Unparsable(raw) => {
                lines.push("Couldn't parse.".to_string());
                lines.push(raw.clone());
            }
            PopupContent::Error(message) => {
                lines.push("Error".to_string());
                lines.push(message.clone());
            }
        }

        lines
    }

    /// Lines with terminal styling applied
    pub fn styled_lines(&self) -> Vec<String> {
        let lines = self.lines();
        lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| match (i, &self.content) {
                (0, _) => line.dark_grey().to_string(),
                (1, PopupContent::Card(_)) => line.bold().to_string(),
                (1, PopupContent::Error(_) | PopupContent::Unparsable(_)) => {
                    line.red().bold().to_string()
                }
                (_, PopupContent::Card(_)) if line.ends_with(SAVED_TEXT) => {
                    line.green().to_string()
                }
                _ => line,
            })
            .collect()
    }
}

/// Short cue for the clipboard: `term — gloss`
pub fn copy_text(card: &Card) -> String {
    format!("{} — {}", card.term, card.gloss)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Card {
        Card {
            term: "bonjour".to_string(),
            gloss: "hello".to_string(),
            pos: "interjection".to_string(),
            example: "Bonjour, comment ça va?".to_string(),
            example_translation: "Hello, how are you?".to_string(),
            page_title: "Article".to_string(),
            page_url: "https://example.fr".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_card_lines() {
        let mut view = PopupView::new(
            PopupId::new(),
            Anchor {
                left: 16.0,
                top: 24.0,
            },
            PopupContent::Card(card()),
        );
        let lines = view.lines();
        assert_eq!(lines[1], "bonjour (interjection)");
        assert_eq!(lines[2], "Meaning: hello");
        assert_eq!(lines[5], "Article — https://example.fr");

        view.status = SAVED_TEXT.to_string();
        assert!(view.lines().last().unwrap().ends_with("Saved ✓"));
    }

    #[test]
    fn test_error_and_unparsable_lines() {
        let anchor = Anchor {
            left: 0.0,
            top: 0.0,
        };
        let error = PopupView::new(
            PopupId::new(),
            anchor,
            PopupContent::Error("HTTP 401: Unauthorized".to_string()),
        );
        assert_eq!(error.lines()[1..], ["Error", "HTTP 401: Unauthorized"]);
        assert!(error.card().is_none());

        let unparsable =
            PopupView::new(PopupId::new(), anchor, PopupContent::Unparsable("oops".to_string()));
        assert_eq!(unparsable.lines()[1], "Couldn't parse.");
    }

    #[test]
    fn test_copy_text() {
        assert_eq!(copy_text(&card()), "bonjour — hello");
    }
}
