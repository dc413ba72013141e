use serde::Serialize;
use tracing::{error, warn};

use super::types::ReportError;
use crate::reporting::ExportFormat;

pub const MSG_NO_CANDIDATE: &str =
    "La respuesta de la IA no contiene un candidato válido. La respuesta pudo haber sido bloqueada por seguridad.";
pub const MSG_INVALID_JSON: &str = "La respuesta de la IA no tenía un formato JSON válido.";
pub const MSG_SAFETY_BLOCKED: &str = "La respuesta fue bloqueada por filtros de seguridad.";
pub const MSG_EMPTY_RESPONSE: &str = "La respuesta de la IA estaba vacía.";
pub const MSG_NETWORK: &str = "No se pudo conectar con el servicio de IA debido a un problema de red. Por favor, verifique su conexión a internet e inténtelo de nuevo.";
pub const MSG_UNAVAILABLE: &str = "No se pudo conectar con el servicio de IA. Inténtelo de nuevo más tarde.";
pub const MSG_EXPORT_PDF: &str = "Hubo un error al generar el PDF.";
pub const MSG_EXPORT_XLSX: &str = "Hubo un error al generar el archivo Excel.";

/// Substrings that identify a transport failure in free-form error text.
///
/// The provider exposes no structured code for these, so matching is
/// case-insensitive on the rendered message. A change in upstream wording
/// silently drops an error into `Unavailable`; the tests pin this list.
pub const NETWORK_SIGNATURES: &[&str] = &[
    "proxying failed",
    "failed to fetch",
    "error sending request",
    "connection refused",
    "dns error",
];

/// User-facing failure category. One per entry of the error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    PolicyBlocked,
    NoCandidate,
    InvalidJson,
    SafetyBlocked,
    EmptyResponse,
    Network,
    Unavailable,
    Export,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PolicyBlocked => "policy_blocked",
            Self::NoCandidate => "no_candidate",
            Self::InvalidJson => "invalid_json",
            Self::SafetyBlocked => "safety_blocked",
            Self::EmptyResponse => "empty_response",
            Self::Network => "network",
            Self::Unavailable => "unavailable",
            Self::Export => "export",
        }
    }

    /// Domain categories carry a message that already reads well for the end
    /// user and passes through to the surface unchanged.
    pub fn is_domain(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorClassification {
    pub category: ErrorCategory,
    pub message: String,
}

impl ErrorClassification {
    fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self { category, message: message.into() }
    }
}

pub fn looks_like_network_failure(text: &str) -> bool {
    let lower = text.to_lowercase();
    NETWORK_SIGNATURES.iter().any(|sig| lower.contains(sig))
}

impl ReportError {
    /// Map this error to its user-facing category and localized message.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            ReportError::PromptBlocked(reason) => ErrorClassification::new(
                ErrorCategory::PolicyBlocked,
                format!("La solicitud fue bloqueada por la API por: {}.", reason),
            ),
            ReportError::NoCandidate => {
                ErrorClassification::new(ErrorCategory::NoCandidate, MSG_NO_CANDIDATE)
            }
            ReportError::InvalidJson(_) => {
                ErrorClassification::new(ErrorCategory::InvalidJson, MSG_INVALID_JSON)
            }
            ReportError::SafetyBlocked => {
                ErrorClassification::new(ErrorCategory::SafetyBlocked, MSG_SAFETY_BLOCKED)
            }
            ReportError::EmptyResponse { finish_reason } => {
                let message = match finish_reason {
                    Some(reason) => {
                        format!("{} (Razón de finalización: {})", MSG_EMPTY_RESPONSE, reason)
                    }
                    None => MSG_EMPTY_RESPONSE.to_string(),
                };
                ErrorClassification::new(ErrorCategory::EmptyResponse, message)
            }
            ReportError::Network(_) => ErrorClassification::new(ErrorCategory::Network, MSG_NETWORK),
            ReportError::Export { format, .. } => {
                let message = match format {
                    ExportFormat::Pdf => MSG_EXPORT_PDF.to_string(),
                    ExportFormat::Xlsx => MSG_EXPORT_XLSX.to_string(),
                    other => format!("Hubo un error al generar el archivo {}.", other.label()),
                };
                ErrorClassification::new(ErrorCategory::Export, message)
            }
            other => {
                if looks_like_network_failure(&other.to_string()) {
                    ErrorClassification::new(ErrorCategory::Network, MSG_NETWORK)
                } else {
                    ErrorClassification::new(ErrorCategory::Unavailable, MSG_UNAVAILABLE)
                }
            }
        }
    }

    /// Classify and record the technical detail. Unclassified failures are
    /// logged at error level since their detail never reaches the user.
    pub fn classify_logged(&self) -> ErrorClassification {
        let classification = self.classify();
        if classification.category.is_domain() {
            warn!(
                category = classification.category.as_str(),
                error = %self,
                "Report generation failed"
            );
        } else {
            error!(error = %self, "Unclassified failure while generating report");
        }
        classification
    }
}
