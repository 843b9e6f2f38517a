use wordbook_types::{AppEvent, PopupContent, PopupId, UiEvent};

use crate::commands::{Command, HELP};
use crate::popup::PopupView;

/// Open popups, oldest first
#[derive(Default)]
pub struct UiState {
    popups: Vec<PopupView>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn popups(&self) -> &[PopupView] {
        &self.popups
    }

    /// Newest popup, or the one whose id starts with `prefix`
    pub fn find(&mut self, prefix: Option<&str>) -> Option<&mut PopupView> {
        match prefix {
            None => self.popups.last_mut(),
            Some(prefix) => self
                .popups
                .iter_mut()
                .rev()
                .find(|p| p.id.short().starts_with(prefix)),
        }
    }

    fn get(&mut self, id: PopupId) -> Option<&mut PopupView> {
        self.popups.iter_mut().find(|p| p.id == id)
    }

    /// Backend event in, rendered lines out
    pub fn apply(&mut self, event: AppEvent) -> Vec<String> {
        match event {
            AppEvent::ShowPopup {
                id,
                anchor,
                content,
            } => {
                let view = PopupView::new(id, anchor, content);
                let lines = view.styled_lines();
                self.popups.push(view);
                lines
            }
            AppEvent::UpdatePopup { id, content } => match self.get(id) {
                Some(view) => {
                    view.content = content;
                    view.styled_lines()
                }
                None => {
                    // Closed before the response arrived
                    tracing::debug!("Dropping update for closed popup {id}");
                    vec![]
                }
            },
            AppEvent::PopupStatus { id, status } => match self.get(id) {
                Some(view) => {
                    view.status = status;
                    view.styled_lines()
                }
                None => vec![],
            },
            AppEvent::Toast(message) => vec![toast(&message)],
            AppEvent::BackendReady => vec![toast("Ready."), HELP.to_string()],
            _ => vec![],
        }
    }

    /// Console command in: lines to print and an event for the backend
    pub fn command(&mut self, command: Command) -> (Vec<String>, Option<AppEvent>) {
        match command {
            Command::Add(target) => match self.find(target.as_deref()) {
                Some(view) => match view.card() {
                    Some(card) => {
                        let event = UiEvent::Add {
                            popup: view.id,
                            card: card.clone(),
                        };
                        (vec![], Some(AppEvent::UiEvent(event)))
                    }
                    None => (vec![toast("This popup has no card.")], None),
                },
                None => (vec![toast("No popup open.")], None),
            },
            Command::Copy(target) => match self.find(target.as_deref()).and_then(|v| v.card()) {
                Some(card) => (vec![], Some(AppEvent::UiEvent(UiEvent::Copy(card.clone())))),
                None => (vec![toast("Nothing to copy.")], None),
            },
            Command::Close(target) => {
                let id = self.find(target.as_deref()).map(|v| v.id);
                match id {
                    Some(id) => {
                        self.popups.retain(|p| p.id != id);
                        (vec![toast(&format!("Closed [{id}]"))], None)
                    }
                    None => (vec![toast("No popup open.")], None),
                }
            }
            Command::Export => (vec![], Some(AppEvent::UiEvent(UiEvent::Export))),
            Command::Translate(text) => (vec![], Some(AppEvent::UiEvent(UiEvent::Translate(text)))),
            Command::List => {
                if self.popups.is_empty() {
                    return (vec![toast("No popup open.")], None);
                }
                let lines = self
                    .popups
                    .iter()
                    .map(|p| format!("[{}] {}", p.id, headline(&p.content)))
                    .collect();
                (lines, None)
            }
            Command::Help => (vec![HELP.to_string()], None),
        }
    }
}

fn headline(content: &PopupContent) -> String {
    match content {
        PopupContent::Loading(text) => text.clone(),
        PopupContent::Card(card) => format!("{} — {}", card.term, card.gloss),
        PopupContent::Unparsable(_) => "Couldn't parse.".to_string(),
        PopupContent::Error(message) => format!("Error: {message}"),
    }
}

pub fn toast(message: &str) -> String {
    format!("» {message}")
}
