pub mod export;
pub mod types;

pub use export::ExportCommand;
pub use types::TypesCommand;
