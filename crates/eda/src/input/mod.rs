//! Input parsing and the in-memory table model.

mod parser;
mod source;

pub use parser::{
    content_hash, detect_delimiter, detect_quote, parse_datetime, Parser, ParserConfig,
};
pub use source::{Column, NativeKind, SourceMetadata, Table, Value};
