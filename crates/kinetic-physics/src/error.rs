/// Configuration errors raised when building springs and vectorizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpringError {
    /// A value or vector does not have the vectorizer's dimensions.
    DimensionMismatch { expected: usize, actual: usize },
    /// A vectorizer was asked for an unusable length.
    InvalidLength { length: usize },
}

impl std::fmt::Display for SpringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpringError::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch; expected {expected}, got {actual}")
            }
            SpringError::InvalidLength { length } => {
                write!(f, "invalid vector length {length}")
            }
        }
    }
}

impl std::error::Error for SpringError {}
