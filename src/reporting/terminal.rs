use console::style;

use super::render::{Block, RenderedDocument};
use crate::models::Source;

/// Render a document as styled terminal text.
pub fn render_terminal(doc: &RenderedDocument) -> String {
    let mut lines = Vec::new();
    for block in &doc.blocks {
        let line = match block {
            Block::Title(t) => format!("\n{}", style(t).white().bold().underlined()),
            Block::Subtitle(t) => format!("{}\n", style(t).dim()),
            Block::Heading(t) => format!("\n{} {}", style("▶").cyan().bold(), style(t).cyan().bold()),
            Block::Subheading(t) => format!("\n  {}", style(t).white().bold()),
            Block::Paragraph(t) => format!("  {}", t),
            Block::Bullet(t) => format!("  {} {}", style("•").red(), style(t).red()),
            Block::Badge(t) => format!("\n  {} {}", style("⚠").yellow().bold(), style(t).yellow().bold()),
            Block::Field { label, value } => format!("  {} {}", style(format!("{}:", label)).dim(), value),
            Block::Callout { label, text } => format!(
                "  {} {}\n  {} {}",
                style("│").blue(),
                style(label).blue().bold(),
                style("│").blue(),
                style(text).blue(),
            ),
            Block::Link { label, url } => {
                if label == url {
                    format!("  {} {}", style("↗").dim(), style(url).underlined())
                } else {
                    format!("  {} {} {}", style("↗").dim(), label, style(format!("<{}>", url)).dim())
                }
            }
            Block::Rule => format!("{}", style("─".repeat(60)).dim()),
        };
        lines.push(line);
    }
    lines.join("\n")
}

/// Citations recovered from a failed generation.
pub fn render_recovered_sources(sources: &[Source]) -> String {
    let mut out = format!(
        "{} {}",
        style("Fuentes recuperadas:").yellow().bold(),
        style(sources.len()).yellow()
    );
    for source in sources {
        out.push_str(&format!("\n  {} {} {}", style("↗").dim(), source.display_title(), style(format!("<{}>", source.uri)).dim()));
    }
    out
}
