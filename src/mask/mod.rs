//! Pattern masks for single-line text fields.
//!
//! A mask string such as `(999) 999-9999` compiles into literal and slot
//! segments. [`MaskHandle`] keeps a field's value conformant as it is edited,
//! either by repairing edits after they land ([`MaskHandle::handle_raw_edit`])
//! or by vetting keystrokes before they do ([`MaskHandle::handle_keystroke`]).

mod diff;
mod engine;
mod error;
mod handle;
mod matcher;
mod model;
mod parser;
mod pattern;
mod state;

pub use diff::{EditDelta, diff};
pub use engine::{KeystrokeOutcome, Reformat, Reformatter};
pub use error::{MaskError, Rejection};
pub use handle::{EditOutcome, MaskHandle, MaskOptions};
pub use matcher::PatternMatcher;
pub use model::{CharClass, Run, Segment, SegmentKind};
pub use parser::compile;
pub use pattern::CompiledPattern;
pub use state::MaskState;
