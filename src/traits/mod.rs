pub mod output;

pub use output::{Output, TerminalOutput};

#[cfg(test)]
pub use output::MockOutput;
