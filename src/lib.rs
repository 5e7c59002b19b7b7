pub mod app;
pub mod config;
pub mod field;
pub mod logging;
pub mod mask;
pub mod terminal;

pub use config::{MaskConfig, Mode, Preset};
pub use field::{BufferField, MaskedField, SelectionRange, TextField};
pub use mask::{CompiledPattern, EditOutcome, MaskError, MaskHandle, MaskOptions};
