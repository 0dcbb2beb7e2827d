use thiserror::Error;

/// Why a draw request was rejected. Raised before any prize is selected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawError {
    #[error("invalid quantity {quantity}: {reason}")]
    InvalidQuantity { quantity: i64, reason: String },

    #[error("invalid weights: {reason}")]
    InvalidWeights { reason: String },
}

impl DrawError {
    /// Message shown to the person at the draw form.
    pub fn user_message(&self) -> &str {
        match self {
            DrawError::InvalidQuantity { reason, .. } => reason,
            DrawError::InvalidWeights { reason } => reason,
        }
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog must contain at least one prize")]
    Empty,

    #[error("prize #{index} has a blank name")]
    BlankName { index: usize },

    #[error("prize '{name}' is listed more than once")]
    DuplicateName { name: String },

    #[error("prize '{name}' has invalid weight {weight}")]
    InvalidWeight { name: String, weight: f64 },

    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
}
