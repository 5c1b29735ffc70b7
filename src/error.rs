use core::fmt;

/// Result alias for `unmix`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by preprocessing, whitening, the fixed-point solvers and
/// model assembly.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty.
    EmptyInput,

    /// Matrix dimension mismatch (usize).
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// Shape mismatch (string description).
    ShapeMismatch {
        /// Expected shape description.
        expected: String,
        /// Actual shape description.
        actual: String,
    },

    /// An attribute of the input table is not numeric.
    NonNumericAttribute {
        /// Attribute name.
        name: String,
    },

    /// Invalid number of components requested.
    InvalidComponentCount {
        /// Requested count.
        requested: usize,
        /// Number of attributes.
        n_attributes: usize,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// A matrix factorization or scaling step would produce non-finite values.
    NumericalInstability {
        /// Pipeline stage that failed (e.g. "whitening").
        stage: &'static str,
        /// What went wrong.
        detail: String,
    },

    /// A cooperative stop was requested; partial results were discarded.
    Cancelled,
}

impl Error {
    /// Whether this error was raised before any computation, from the
    /// configuration or the shape/kind of the input.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::EmptyInput
                | Error::DimensionMismatch { .. }
                | Error::ShapeMismatch { .. }
                | Error::NonNumericAttribute { .. }
                | Error::InvalidComponentCount { .. }
                | Error::InvalidParameter { .. }
        )
    }

    /// Whether this error is a numerical-instability failure.
    pub fn is_numerical(&self) -> bool {
        matches!(self, Error::NumericalInstability { .. })
    }

    pub(crate) fn unstable(stage: &'static str, detail: impl Into<String>) -> Self {
        Error::NumericalInstability {
            stage,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::ShapeMismatch { expected, actual } => {
                write!(f, "shape mismatch: expected {expected}, actual {actual}")
            }
            Error::NonNumericAttribute { name } => {
                write!(f, "attribute '{name}' is not numeric")
            }
            Error::InvalidComponentCount {
                requested,
                n_attributes,
            } => {
                write!(
                    f,
                    "cannot extract {requested} components from {n_attributes} attributes"
                )
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::NumericalInstability { stage, detail } => {
                write!(f, "numerical instability during {stage}: {detail}")
            }
            Error::Cancelled => write!(f, "computation was cancelled"),
        }
    }
}

impl std::error::Error for Error {}
