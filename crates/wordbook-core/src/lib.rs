pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod response;
pub mod selection;

pub use error::TranslateError;
pub use pipeline::{TranslateSettings, TranslationPipeline};
pub use response::extract_json_object;
pub use selection::{
    CapturedSelection, ScopeError, SelectedRange, SelectionResolver, SelectionScope, Viewport,
};
