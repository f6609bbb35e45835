//! RS-274X parsing: tokenizer, parser state, aperture registry, and the
//! command interpreter.

pub mod aperture;
pub mod parser;
pub mod tokenizer;
pub mod types;

pub use aperture::{parse_definition, ApertureRegistry, PadTemplate, RegistryEntry};
pub use parser::parse_document;
pub use tokenizer::{Command, Tokenizer};
pub use types::{CoordinateFormat, InterpolationMode, ParserState, Polarity, Unit};
