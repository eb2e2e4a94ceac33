#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IntSetError {
    #[error("[IntSet]Blob too short: {0} bytes")]
    TooShort(usize),
    #[error("[IntSet]Invalid encoding: {0}")]
    InvalidEncoding(u32),
    #[error("[IntSet]Blob size {actual} does not match header, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("[IntSet]Empty set")]
    Empty,
    #[error("[IntSet]Elements out of order at position {0}")]
    Unordered(usize),
}
