//! Finds the active text selection across the document, a focused shadow scope
//! and embedded frames, and keeps the last captured selection.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use wordbook_types::{Anchor, PageContext, Rect};

/// Offset used when no selection geometry is known
pub const DEFAULT_OFFSET: f64 = 16.0;

/// Gap between the selection and the popup
const POPUP_GAP: f64 = 8.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectedRange {
    pub text: String,
    /// Per-line boxes, in document order
    pub client_rects: Vec<Rect>,
    pub bounding_rect: Option<Rect>,
}

impl SelectedRange {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.text.is_empty()
    }

    /// First client rect, else the bounding rect
    pub fn rect(&self) -> Option<Rect> {
        self.client_rects.first().copied().or(self.bounding_rect)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("unavailable: {0}")]
    Unavailable(String),
}

/// A surface that can report its own selection
pub trait SelectionScope: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(None)` when nothing is selected
    fn selection(&self) -> Result<Option<SelectedRange>, ScopeError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub scroll_x: f64,
    pub scroll_y: f64,
}

/// Text to translate plus where it was captured
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapturedSelection {
    pub text: String,
    pub page: PageContext,
}

pub struct SelectionResolver {
    document: Arc<dyn SelectionScope>,
    shadow: Mutex<Option<Arc<dyn SelectionScope>>>,
    frames: Vec<Arc<dyn SelectionScope>>,
    page: Mutex<PageContext>,
    cached: Mutex<Option<CapturedSelection>>,
    settle: Duration,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

impl SelectionResolver {
    pub fn new(document: Arc<dyn SelectionScope>) -> Self {
        Self {
            document,
            shadow: Mutex::new(None),
            frames: Vec::new(),
            page: Mutex::new(PageContext::default()),
            cached: Mutex::new(None),
            settle: Duration::from_millis(10),
        }
    }

    pub fn with_frame(mut self, frame: Arc<dyn SelectionScope>) -> Self {
        self.frames.push(frame);
        self
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Delay between pointer-up and reading the selection
    pub fn settle(&self) -> Duration {
        self.settle
    }

    pub fn with_page(self, page: PageContext) -> Self {
        *lock(&self.page) = page;
        self
    }

    /// Focus moved to (or away from) an element hosting its own scope
    pub fn focus_shadow(&self, scope: Option<Arc<dyn SelectionScope>>) {
        *lock(&self.shadow) = scope;
    }

    pub fn set_page(&self, page: PageContext) {
        *lock(&self.page) = page;
    }

    pub fn page(&self) -> PageContext {
        lock(&self.page).clone()
    }

    /// First non-collapsed range: document, then focused shadow scope, then frames
    pub fn active_range(&self) -> Option<SelectedRange> {
        if let Some(range) = query(self.document.as_ref()) {
            return Some(range);
        }

        let shadow = lock(&self.shadow).clone();
        if let Some(range) = shadow.as_ref().and_then(|s| query(s.as_ref())) {
            return Some(range);
        }

        self.frames.iter().find_map(|frame| query(frame.as_ref()))
    }

    /// Live selection text, untrimmed. Empty when nothing usable is selected.
    pub fn resolve_selection_text(&self) -> String {
        self.active_range().map(|r| r.text).unwrap_or_default()
    }

    /// Selection geometry, or a fixed on-screen default
    pub fn bounding_rect_of_selection(&self) -> Rect {
        self.active_range()
            .and_then(|r| r.rect())
            .unwrap_or(Rect {
                left: DEFAULT_OFFSET,
                top: DEFAULT_OFFSET,
                right: DEFAULT_OFFSET,
                bottom: DEFAULT_OFFSET,
            })
    }

    /// Where a popup for the current selection should open
    pub fn popup_anchor(&self, viewport: Viewport) -> Anchor {
        anchor_below(self.bounding_rect_of_selection(), viewport)
    }

    /// Pointer released: wait for the selection to settle, then cache it
    pub async fn pointer_up(&self) {
        tokio::time::sleep(self.settle).await;
        let text = self.resolve_selection_text();
        self.record(&text, self.page());
    }

    /// Cache text reported by a host surface. Blank text leaves the cache alone so a
    /// stray click cannot wipe a selection captured moments earlier.
    pub fn record(&self, text: &str, page: PageContext) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        tracing::debug!("Cached selection ({} chars)", text.chars().count());
        *lock(&self.cached) = Some(CapturedSelection {
            text: text.to_string(),
            page,
        });
    }

    /// Dismiss pressed
    pub fn clear(&self) {
        *lock(&self.cached) = None;
    }

    pub fn cached(&self) -> Option<CapturedSelection> {
        lock(&self.cached).clone()
    }

    /// Cached selection if any, else the live one, trimmed
    pub fn current_selection(&self) -> CapturedSelection {
        if let Some(cached) = self.cached() {
            return cached;
        }
        CapturedSelection {
            text: self.resolve_selection_text().trim().to_string(),
            page: self.page(),
        }
    }
}

fn query(scope: &dyn SelectionScope) -> Option<SelectedRange> {
    match scope.selection() {
        Ok(Some(range)) if !range.is_collapsed() => Some(range),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Skipping scope {}: {e}", scope.name());
            None
        }
    }
}

/// Zero coordinates count as unknown and fall back to the default offset
pub fn anchor_below(rect: Rect, viewport: Viewport) -> Anchor {
    let or_default = |v: f64| if v == 0.0 || v.is_nan() { DEFAULT_OFFSET } else { v };
    Anchor {
        left: or_default(rect.left) + viewport.scroll_x,
        top: or_default(rect.bottom) + viewport.scroll_y + POPUP_GAP,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedScope {
        name: &'static str,
        result: Result<Option<SelectedRange>, &'static str>,
    }

    impl FixedScope {
        fn selected(name: &'static str, text: &str) -> Arc<Self> {
            Arc::new(Self {
                name,
                result: Ok(Some(SelectedRange::text(text))),
            })
        }

        fn empty(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                result: Ok(None),
            })
        }

        fn denied(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                result: Err("cross-origin"),
            })
        }
    }

    impl SelectionScope for FixedScope {
        fn name(&self) -> &str {
            self.name
        }

        fn selection(&self) -> Result<Option<SelectedRange>, ScopeError> {
            self.result
                .clone()
                .map_err(|e| ScopeError::AccessDenied(e.to_string()))
        }
    }

    /// Selection whose text can be changed after construction
    struct LiveScope(Mutex<String>);

    impl SelectionScope for LiveScope {
        fn name(&self) -> &str {
            "live"
        }

        fn selection(&self) -> Result<Option<SelectedRange>, ScopeError> {
            Ok(Some(SelectedRange::text(self.0.lock().unwrap().clone())))
        }
    }

    #[test]
    fn test_document_selection_wins() {
        let resolver = SelectionResolver::new(FixedScope::selected("doc", "main"))
            .with_frame(FixedScope::selected("frame", "frame text"));
        resolver.focus_shadow(Some(FixedScope::selected("shadow", "shadow text")));
        assert_eq!(resolver.resolve_selection_text(), "main");
    }

    #[test]
    fn test_shadow_scope_before_frames() {
        let resolver = SelectionResolver::new(FixedScope::empty("doc"))
            .with_frame(FixedScope::selected("frame", "frame text"));
        resolver.focus_shadow(Some(FixedScope::selected("shadow", "shadow text")));
        assert_eq!(resolver.resolve_selection_text(), "shadow text");

        resolver.focus_shadow(None);
        assert_eq!(resolver.resolve_selection_text(), "frame text");
    }

    #[test]
    fn test_inaccessible_frames_are_skipped() {
        let resolver = SelectionResolver::new(FixedScope::empty("doc"))
            .with_frame(FixedScope::denied("cross-origin"))
            .with_frame(FixedScope::selected("collapsed", ""))
            .with_frame(FixedScope::selected("second", "from second frame"))
            .with_frame(FixedScope::selected("third", "ignored"));
        assert_eq!(resolver.resolve_selection_text(), "from second frame");
    }

    #[test]
    fn test_nothing_selected_is_empty_string() {
        let resolver = SelectionResolver::new(FixedScope::denied("doc"))
            .with_frame(FixedScope::denied("frame"));
        resolver.focus_shadow(Some(FixedScope::denied("shadow")));
        assert_eq!(resolver.resolve_selection_text(), "");
    }

    #[test]
    fn test_rect_prefers_first_client_rect() {
        let first = Rect {
            left: 100.0,
            top: 40.0,
            right: 180.0,
            bottom: 60.0,
        };
        let bounding = Rect {
            left: 90.0,
            top: 40.0,
            right: 300.0,
            bottom: 120.0,
        };
        let scope = Arc::new(FixedScope {
            name: "doc",
            result: Ok(Some(SelectedRange {
                text: "two lines".to_string(),
                client_rects: vec![first],
                bounding_rect: Some(bounding),
            })),
        });
        let resolver = SelectionResolver::new(scope);
        assert_eq!(resolver.bounding_rect_of_selection(), first);

        let anchor = resolver.popup_anchor(Viewport {
            scroll_x: 5.0,
            scroll_y: 200.0,
        });
        assert_eq!(anchor, Anchor { left: 105.0, top: 268.0 });
    }

    #[test]
    fn test_rect_falls_back_to_bounding_rect() {
        let bounding = Rect {
            left: 10.0,
            top: 20.0,
            right: 30.0,
            bottom: 40.0,
        };
        let scope = Arc::new(FixedScope {
            name: "doc",
            result: Ok(Some(SelectedRange {
                text: "x".to_string(),
                client_rects: vec![],
                bounding_rect: Some(bounding),
            })),
        });
        assert_eq!(
            SelectionResolver::new(scope).bounding_rect_of_selection(),
            bounding
        );
    }

    #[test]
    fn test_default_anchor_is_on_screen() {
        let resolver = SelectionResolver::new(FixedScope::empty("doc"));
        let anchor = resolver.popup_anchor(Viewport::default());
        assert_eq!(anchor, Anchor { left: 16.0, top: 24.0 });
    }

    #[test]
    fn test_cache_survives_collapse_until_cleared() {
        let resolver = SelectionResolver::new(FixedScope::empty("doc"))
            .with_page(PageContext {
                title: "Le Monde".to_string(),
                url: "https://lemonde.fr".to_string(),
            });
        resolver.record("  bonjour \n", resolver.page());
        resolver.record("   ", resolver.page());

        let current = resolver.current_selection();
        assert_eq!(current.text, "bonjour");
        assert_eq!(current.page.title, "Le Monde");

        resolver.clear();
        assert_eq!(resolver.current_selection().text, "");
    }

    #[tokio::test]
    async fn test_pointer_up_reads_after_settle() {
        let live = Arc::new(LiveScope(Mutex::new(String::new())));
        let resolver = Arc::new(
            SelectionResolver::new(live.clone()).with_settle(Duration::from_millis(50)),
        );

        let pending = {
            let resolver = resolver.clone();
            tokio::spawn(async move { resolver.pointer_up().await })
        };
        // Selection finishes updating within the settle window
        *live.0.lock().unwrap() = " salut ".to_string();
        pending.await.unwrap();

        *live.0.lock().unwrap() = String::new();
        assert_eq!(resolver.current_selection().text, "salut");
    }
}
