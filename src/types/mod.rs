//! Shared types for pagination and response shaping.

mod cursor;
mod pagination;
mod response;

pub use cursor::{CursorPage, CursorToken};
pub use pagination::{OffsetPage, PageParams};
pub use response::{Created, NoContent};
