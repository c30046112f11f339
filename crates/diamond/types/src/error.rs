/// Errors from parsing selectors, addresses and action codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("expected {expected} hex digits, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("invalid hex: {0}")]
    Hex(String),

    #[error("unknown facet cut action code: {0}")]
    UnknownAction(u8),
}
