//! Custom request extractors.

mod page_headers;
mod validated_json;

pub use page_headers::{CursorPageHeaders, OffsetPageHeaders};
pub use validated_json::ValidatedJson;
