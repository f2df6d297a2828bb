//! Command interpreter.
//!
//! # Module Structure
//!
//! - `keywords`: keyword families and the shared read-only `KeywordTable`
//! - `parser`: `CommandInterpreter::parse` and `ParseResult`

mod keywords;
mod parser;

pub use keywords::{Family, KeywordFamily, KeywordTable};
pub use parser::{CommandInterpreter, ParseResult};
