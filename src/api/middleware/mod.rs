//! HTTP middleware.

mod panic_handler;
mod trace;

pub use panic_handler::handle_panic;
pub use trace::{trace_context_middleware, TraceId};
