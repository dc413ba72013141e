//! PDF export of the rendered report.
//!
//! Lays the rendered blocks onto Letter pages with the builtin Helvetica
//! faces. Lines are wrapped on an estimated glyph width and a new page is
//! started whenever the cursor reaches the bottom margin.

use std::borrow::Cow;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use tracing::debug;

use super::render::{Block, RenderedDocument, REPORT_TITLE};
use super::ExportFormat;
use crate::errors::ReportError;

pub const PAGE_WIDTH_MM: f32 = 215.9;
pub const PAGE_HEIGHT_MM: f32 = 279.4;
pub const MARGIN_MM: f32 = 12.7;

const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica advance as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;
const LINE_SPACING: f32 = 1.35;

#[derive(Debug, Clone, Copy, PartialEq)]
struct TextStyle {
    size: f32,
    bold: bool,
    indent_mm: f32,
    space_before_mm: f32,
}

impl TextStyle {
    const fn new(size: f32, bold: bool, indent_mm: f32, space_before_mm: f32) -> Self {
        Self { size, bold, indent_mm, space_before_mm }
    }
}

/// Text lines and their style for one block.
fn layout_block(block: &Block) -> (TextStyle, Vec<String>) {
    match block {
        Block::Title(t) => (TextStyle::new(18.0, true, 0.0, 0.0), vec![t.clone()]),
        Block::Subtitle(t) => (TextStyle::new(10.0, false, 0.0, 2.0), vec![t.clone()]),
        Block::Heading(t) => (TextStyle::new(14.0, true, 0.0, 6.0), vec![t.clone()]),
        Block::Subheading(t) => (TextStyle::new(12.0, true, 0.0, 4.0), vec![t.clone()]),
        Block::Paragraph(t) => (TextStyle::new(10.0, false, 0.0, 1.5), vec![t.clone()]),
        Block::Bullet(t) => (TextStyle::new(10.0, false, 4.0, 1.0), vec![format!("- {}", t)]),
        Block::Badge(t) => (TextStyle::new(9.0, true, 0.0, 3.0), vec![format!("[{}]", t)]),
        Block::Field { label, value } => {
            (TextStyle::new(9.0, false, 0.0, 0.5), vec![format!("{}: {}", label, value)])
        }
        Block::Callout { label, text } => {
            (TextStyle::new(9.5, false, 6.0, 2.0), vec![label.clone(), text.clone()])
        }
        Block::Link { label, url } => {
            let line = if label == url { url.clone() } else { format!("{} ({})", label, url) };
            (TextStyle::new(9.0, false, 0.0, 1.0), vec![line])
        }
        Block::Rule => (TextStyle::new(10.0, false, 0.0, 4.0), Vec::new()),
    }
}

/// WinAnsiEncoding code points above Latin-1's ASCII range that are not
/// Latin-1 themselves.
const WIN_ANSI_EXTRAS: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

/// Whether the builtin Helvetica faces can encode `c`.
fn is_win_ansi(c: char) -> bool {
    matches!(c, '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}') || WIN_ANSI_EXTRAS.contains(c)
}

/// ASCII stand-ins for symbols the builtin fonts lack.
fn ascii_fallback(c: char) -> Option<&'static str> {
    Some(match c {
        '→' | '⇒' => "->",
        '←' | '⇐' => "<-",
        '↔' => "<->",
        '↗' | '↑' => "^",
        '↓' => "v",
        '≥' => ">=",
        '≤' => "<=",
        '≠' => "!=",
        '≈' => "~",
        '−' | '‐' | '‑' => "-",
        '▶' | '►' => ">",
        '⚠' => "!",
        '✓' | '✔' => "v",
        '✗' | '✘' => "x",
        _ => return None,
    })
}

/// Text the builtin fonts can show. Known symbols get ASCII stand-ins,
/// anything else unencodable is dropped and counted in the debug log.
pub fn to_win_ansi(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_win_ansi) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut dropped = 0usize;
    for c in text.chars() {
        if is_win_ansi(c) {
            out.push(c);
        } else if let Some(fallback) = ascii_fallback(c) {
            out.push_str(fallback);
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        debug!(dropped, "Characters outside WinAnsiEncoding left out of PDF text");
    }
    Cow::Owned(out)
}

/// Greedy word wrap on a character budget. Words longer than a line are
/// split across lines.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > max_chars && current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

fn chars_per_line(style: &TextStyle) -> usize {
    let usable = PAGE_WIDTH_MM - 2.0 * MARGIN_MM - style.indent_mm;
    let glyph_mm = style.size * PT_TO_MM * AVG_GLYPH_WIDTH;
    (usable / glyph_mm).floor() as usize
}

struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor_mm: f32,
    pages: usize,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, ReportError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Contenido");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            cursor_mm: PAGE_HEIGHT_MM - MARGIN_MM,
            pages: 1,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Contenido");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor_mm = PAGE_HEIGHT_MM - MARGIN_MM;
        self.pages += 1;
    }

    fn advance(&mut self, mm: f32) {
        self.cursor_mm -= mm;
        if self.cursor_mm < MARGIN_MM {
            self.new_page();
        }
    }

    fn write_line(&mut self, text: &str, style: &TextStyle) {
        let line_mm = style.size * PT_TO_MM * LINE_SPACING;
        if self.cursor_mm - line_mm < MARGIN_MM {
            self.new_page();
        }
        self.cursor_mm -= line_mm;
        let font = if style.bold { &self.bold } else { &self.regular };
        self.layer.use_text(
            text,
            style.size,
            Mm(MARGIN_MM + style.indent_mm),
            Mm(self.cursor_mm),
            font,
        );
    }

    fn write_block(&mut self, block: &Block) {
        let (style, paragraphs) = layout_block(block);
        self.advance(style.space_before_mm);
        let width = chars_per_line(&style);
        for (i, paragraph) in paragraphs.iter().enumerate() {
            // Callout labels are bold, their body is not.
            let style = match block {
                Block::Callout { .. } if i == 0 => TextStyle { bold: true, ..style },
                _ => style,
            };
            for line in wrap_text(&to_win_ansi(paragraph), width) {
                self.write_line(&line, &style);
            }
        }
    }

    fn finish(self) -> Result<Vec<u8>, ReportError> {
        self.doc.save_to_bytes().map_err(pdf_err)
    }
}

fn pdf_err(e: impl std::fmt::Display) -> ReportError {
    ReportError::export(ExportFormat::Pdf, e.to_string())
}

/// Paginate a rendered document into PDF bytes.
pub fn export_pdf(document: &RenderedDocument) -> Result<Vec<u8>, ReportError> {
    let mut writer = PageWriter::new(REPORT_TITLE)?;
    for block in &document.blocks {
        writer.write_block(block);
    }
    debug!(pages = writer.pages, blocks = document.blocks.len(), "PDF laid out");
    writer.finish()
}
