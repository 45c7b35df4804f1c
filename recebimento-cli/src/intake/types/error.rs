//! Error types for intake operations

/// Required form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    ProcessNumber,
    InvoiceNumber,
    Ni,
}

impl RequiredField {
    pub fn label(&self) -> &'static str {
        match self {
            RequiredField::ProcessNumber => "Nº Processo",
            RequiredField::InvoiceNumber => "NF",
            RequiredField::Ni => "NI",
        }
    }
}

/// Form input rejected before anything is written
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// One or more required fields are blank
    MissingFields(Vec<RequiredField>),
    /// Quantity is negative or not a number
    InvalidQuantity(f64),
    /// Area is not one of the known locations
    UnknownArea { area: String, known: Vec<String> },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingFields(fields) => {
                let labels: Vec<_> = fields.iter().map(|f| f.label()).collect();
                write!(f, "Preencha: {}", labels.join(", "))
            }
            ValidationError::InvalidQuantity(qty) => {
                write!(f, "Quantidade inválida: {} (deve ser >= 0)", qty)
            }
            ValidationError::UnknownArea { area, known } => {
                write!(
                    f,
                    "Área desconhecida '{}' - opções: {}",
                    area,
                    known.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Failure at the session boundary
#[derive(Debug)]
pub enum SessionError {
    /// Form input rejected, nothing written
    Validation(ValidationError),
    /// Backend unreachable or unreadable, operation aborted
    StorageUnavailable(anyhow::Error),
    /// No intake recorded for the requested NI
    NotFound { ni: String },
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Validation(err) => write!(f, "{}", err),
            SessionError::StorageUnavailable(err) => {
                write!(f, "Storage unavailable: {:#}", err)
            }
            SessionError::NotFound { ni } => write!(f, "No intake recorded for NI '{}'", ni),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Validation(err) => Some(err),
            SessionError::StorageUnavailable(err) => Some(&**err),
            SessionError::NotFound { .. } => None,
        }
    }
}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        SessionError::Validation(err)
    }
}

impl From<anyhow::Error> for SessionError {
    fn from(err: anyhow::Error) -> Self {
        SessionError::StorageUnavailable(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message_lists_all() {
        let err = ValidationError::MissingFields(vec![
            RequiredField::ProcessNumber,
            RequiredField::Ni,
        ]);
        assert_eq!(err.to_string(), "Preencha: Nº Processo, NI");
    }

    #[test]
    fn test_storage_error_keeps_context_chain() {
        let inner = anyhow::anyhow!("connection refused").context("Failed to download workbook");
        let err = SessionError::from(inner);
        let text = err.to_string();
        assert!(text.contains("Failed to download workbook"));
        assert!(text.contains("connection refused"));
    }
}
