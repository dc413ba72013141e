use serde::{Deserialize, Serialize};
use super::finding::{default_on_null, Finding};

/// Weekly strategic report as produced by the model.
///
/// The executive summary is the only required field. Missing or null alert
/// and findings lists decode as empty, which renderers treat as "nothing to
/// show".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub executive_summary: String,
    #[serde(default, deserialize_with = "default_on_null")]
    pub critical_alerts: Vec<String>,
    #[serde(default, deserialize_with = "default_on_null")]
    pub financial_sustainability: Vec<Finding>,
    #[serde(default, deserialize_with = "default_on_null")]
    pub pricing_regulation: Vec<Finding>,
    #[serde(default, deserialize_with = "default_on_null")]
    pub new_therapies_access: Vec<Finding>,
}

/// The three topical sections, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    FinancialSustainability,
    PricingRegulation,
    NewTherapiesAccess,
}

impl Section {
    pub const ALL: [Section; 3] = [
        Section::FinancialSustainability,
        Section::PricingRegulation,
        Section::NewTherapiesAccess,
    ];

    /// Field name in the JSON payload.
    pub fn key(&self) -> &'static str {
        match self {
            Section::FinancialSustainability => "financialSustainability",
            Section::PricingRegulation => "pricingRegulation",
            Section::NewTherapiesAccess => "newTherapiesAccess",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::FinancialSustainability => "Flujos y Sostenibilidad Financiera",
            Section::PricingRegulation => "Regulación de Precios de Medicamentos",
            Section::NewTherapiesAccess => "Acceso y Regulación de Nuevas Terapias",
        }
    }
}

impl Report {
    pub fn findings(&self, section: Section) -> &[Finding] {
        match section {
            Section::FinancialSustainability => &self.financial_sustainability,
            Section::PricingRegulation => &self.pricing_regulation,
            Section::NewTherapiesAccess => &self.new_therapies_access,
        }
    }

    /// Sections that have at least one finding, in display order.
    pub fn populated_sections(&self) -> impl Iterator<Item = (Section, &[Finding])> + '_ {
        Section::ALL
            .into_iter()
            .map(|s| (s, self.findings(s)))
            .filter(|(_, findings)| !findings.is_empty())
    }

    pub fn total_findings(&self) -> usize {
        Section::ALL.iter().map(|s| self.findings(*s).len()).sum()
    }

    pub fn high_priority_count(&self) -> usize {
        Section::ALL
            .iter()
            .flat_map(|s| self.findings(*s))
            .filter(|f| f.is_high_priority)
            .count()
    }
}
