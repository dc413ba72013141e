use crate::models::{Finding, Report, Source};

pub const REPORT_TITLE: &str = "Monitor Estratégico del Sistema de Salud en Colombia";
pub const REPORT_SUBTITLE: &str =
    "Análisis en tiempo real sobre flujos financieros, regulación, acceso a innovación y narrativa política.";
pub const NO_ALERTS: &str = "No se detectaron alertas críticas esta semana.";
pub const HIGH_PRIORITY_BADGE: &str = "ALERTA DE ALTO IMPACTO";

/// One laid-out element of the rendered report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Title(String),
    Subtitle(String),
    Heading(String),
    Subheading(String),
    Paragraph(String),
    Bullet(String),
    Badge(String),
    Field { label: String, value: String },
    Callout { label: String, text: String },
    Link { label: String, url: String },
    Rule,
}

/// The rendered report region: what the screen shows and what the PDF
/// exporter lays out onto pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedDocument {
    pub blocks: Vec<Block>,
}

impl RenderedDocument {
    fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::Title(t) => out.push_str(&format!("# {}\n\n", t)),
                Block::Subtitle(t) => out.push_str(&format!("_{}_\n\n", t)),
                Block::Heading(t) => out.push_str(&format!("## {}\n\n", t)),
                Block::Subheading(t) => out.push_str(&format!("### {}\n\n", t)),
                Block::Paragraph(t) => out.push_str(&format!("{}\n\n", t)),
                Block::Bullet(t) => out.push_str(&format!("- {}\n", t)),
                Block::Badge(t) => out.push_str(&format!("**⚠ {}**\n\n", t)),
                Block::Field { label, value } => out.push_str(&format!("**{}:** {}  \n", label, value)),
                Block::Callout { label, text } => {
                    out.push_str(&format!("\n> **{}**\n> {}\n\n", label, text))
                }
                Block::Link { label, url } => out.push_str(&format!("[{}]({})\n\n", label, url)),
                Block::Rule => out.push_str("\n---\n\n"),
            }
        }
        out
    }
}

fn push_finding(doc: &mut RenderedDocument, finding: &Finding) {
    if finding.is_high_priority {
        doc.push(Block::Badge(HIGH_PRIORITY_BADGE.to_string()));
    }
    doc.push(Block::Subheading(finding.title.clone()));
    doc.push(Block::Field { label: "Sentimiento".into(), value: finding.sentiment.label().into() });
    if !finding.key_actor.is_empty() {
        doc.push(Block::Field { label: "Actor Clave".into(), value: finding.key_actor.clone() });
    }
    if !finding.source.is_empty() {
        doc.push(Block::Field { label: "Fuente".into(), value: finding.source.clone() });
    }
    doc.push(Block::Paragraph(finding.summary.clone()));
    if !finding.pharma_impact.is_empty() {
        doc.push(Block::Callout {
            label: "Análisis de Impacto para la Industria Farmacéutica".into(),
            text: finding.pharma_impact.clone(),
        });
    }
    if !finding.source_url.is_empty() {
        doc.push(Block::Link { label: "Ver fuente original".into(), url: finding.source_url.clone() });
    }
}

/// Lay out a report and its citations. Sections without findings and an
/// empty source list are left out entirely.
pub fn render_document(report: &Report, sources: &[Source]) -> RenderedDocument {
    let mut doc = RenderedDocument::default();
    doc.push(Block::Title(REPORT_TITLE.to_string()));
    doc.push(Block::Subtitle(REPORT_SUBTITLE.to_string()));

    doc.push(Block::Heading("Resumen Ejecutivo".into()));
    doc.push(Block::Paragraph(report.executive_summary.clone()));

    doc.push(Block::Heading("Alertas Críticas".into()));
    if report.critical_alerts.is_empty() {
        doc.push(Block::Paragraph(NO_ALERTS.to_string()));
    } else {
        for alert in &report.critical_alerts {
            doc.push(Block::Bullet(alert.clone()));
        }
    }

    for (section, findings) in report.populated_sections() {
        doc.push(Block::Rule);
        doc.push(Block::Heading(section.title().to_string()));
        for finding in findings {
            push_finding(&mut doc, finding);
        }
    }

    if !sources.is_empty() {
        doc.push(Block::Rule);
        doc.push(Block::Heading("Fuentes Consultadas".into()));
        for source in sources {
            doc.push(Block::Link {
                label: source.display_title().to_string(),
                url: source.uri.clone(),
            });
        }
    }
    doc
}
