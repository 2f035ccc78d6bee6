//! Configuration text synthesis: a structural printer that emits
//! JSON-flavoured block text, followed by an ordered sequence of text-level
//! rewrite rules that repair it into canonical syntax.

pub mod canonicalize;
pub mod printer;

pub use canonicalize::canonicalize;
pub use printer::print_document;
