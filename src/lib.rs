//! Enrich errors with a user facing message, an opaque payload, and the call stack at the point of
//! failure, and render them as readable (optionally colourised) reports

/// Wrapping the colour handling
mod coloured;
/// The report entry point and the renderer
mod report;
/// Extension trait to wrap errors without unpacking the `Result`
mod result_ext;
/// Capture of the call chain
mod stack_trace;
/// An error with all additional context
mod traced_error;

pub use coloured::*;
pub use report::*;
pub use result_ext::*;
pub use stack_trace::*;
pub use traced_error::*;
