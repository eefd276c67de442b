mod forward_byte_parser;

pub use forward_byte_parser::ForwardByteParser;

#[derive(Debug, thiserror::Error)]
pub enum ParsingError {
    #[error("Not enough bytes: {requested} requested out of {available} available")]
    NotEnoughBytes { requested: usize, available: usize },
}

type Error = ParsingError;
type Result<T, E = ParsingError> = std::result::Result<T, E>;
