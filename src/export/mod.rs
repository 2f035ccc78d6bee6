pub mod error;
pub mod workflow;

pub use error::{ExportError, ExportResult};
pub use workflow::{ExportOptions, ExportReport, ExportWorkflow};
