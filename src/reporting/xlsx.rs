//! Spreadsheet export.
//!
//! An `.xlsx` workbook is a zip of SpreadsheetML parts. Text goes into a
//! shared string table; the only style is a bold font for header rows.

use std::borrow::Cow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::errors::ReportError;
use crate::models::{Finding, Report};
use super::ExportFormat;

pub const SUMMARY_SHEET: &str = "Resumen";
/// Longest sheet name written. Excel rejects names over 31 characters.
pub const SHEET_NAME_MAX: usize = 30;
pub const FINDING_HEADERS: [&str; 8] = [
    "Título",
    "Resumen",
    "Impacto para Pharma",
    "Sentimiento",
    "Actor Clave",
    "Fuente",
    "URL",
    "Alta Prioridad",
];

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<String>,
    pub bold: bool,
}

impl Row {
    fn header<S: Into<String>>(cells: impl IntoIterator<Item = S>) -> Self {
        Self { cells: cells.into_iter().map(Into::into).collect(), bold: true }
    }

    fn plain<S: Into<String>>(cells: impl IntoIterator<Item = S>) -> Self {
        Self { cells: cells.into_iter().map(Into::into).collect(), bold: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Row>,
}

/// Characters XML 1.0 allows in text content.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Drop characters that would make a part unreadable, such as stray
/// control characters in model output.
pub fn xml_safe(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|c| is_xml_char(*c)).collect())
    }
}

pub fn sheet_name(title: &str) -> String {
    xml_safe(title).chars().take(SHEET_NAME_MAX).collect()
}

fn finding_row(f: &Finding) -> Row {
    Row::plain([
        f.title.clone(),
        f.summary.clone(),
        f.pharma_impact.clone(),
        f.sentiment.label().to_string(),
        f.key_actor.clone(),
        f.source.clone(),
        f.source_url.clone(),
        if f.is_high_priority { "Sí" } else { "No" }.to_string(),
    ])
}

/// Sheet layout for a report: the summary sheet, then one sheet per
/// section that has findings.
pub fn build_sheets(report: &Report) -> Vec<Sheet> {
    let mut summary_rows = vec![
        Row::header(["Resumen Ejecutivo"]),
        Row::plain([report.executive_summary.clone()]),
        Row::plain(Vec::<String>::new()),
        Row::header(["Alertas Críticas"]),
    ];
    summary_rows.extend(report.critical_alerts.iter().map(|a| Row::plain([a.clone()])));

    let mut sheets = vec![Sheet { name: SUMMARY_SHEET.to_string(), rows: summary_rows }];
    for (section, findings) in report.populated_sections() {
        let mut rows = vec![Row::header(FINDING_HEADERS)];
        rows.extend(findings.iter().map(finding_row));
        sheets.push(Sheet { name: sheet_name(section.title()), rows });
    }
    sheets
}

/// Shared string table, indexed in first-use order.
#[derive(Default)]
struct SharedStrings {
    strings: Vec<String>,
    index: HashMap<String, usize>,
    refs: usize,
}

impl SharedStrings {
    fn intern(&mut self, value: &str) -> usize {
        self.refs += 1;
        let value = xml_safe(value).into_owned();
        match self.index.entry(value) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                let idx = self.strings.len();
                self.strings.push(e.key().clone());
                *e.insert(idx)
            }
        }
    }

    fn to_xml(&self) -> String {
        let mut xml = format!(
            "{}<sst xmlns=\"{}\" count=\"{}\" uniqueCount=\"{}\">",
            XML_DECL,
            NS_MAIN,
            self.refs,
            self.strings.len()
        );
        for s in &self.strings {
            xml.push_str(&format!("<si><t xml:space=\"preserve\">{}</t></si>", escape(s.as_str())));
        }
        xml.push_str("</sst>");
        xml
    }
}

/// Column letters for a zero-based index: 0 -> A, 25 -> Z, 26 -> AA.
fn column_name(mut idx: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

fn sheet_xml(sheet: &Sheet, strings: &mut SharedStrings) -> String {
    let mut xml = format!("{}<worksheet xmlns=\"{}\"><sheetData>", XML_DECL, NS_MAIN);
    for (r, row) in sheet.rows.iter().enumerate() {
        let row_num = r + 1;
        xml.push_str(&format!("<row r=\"{}\">", row_num));
        for (c, value) in row.cells.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let style = if row.bold { " s=\"1\"" } else { "" };
            xml.push_str(&format!(
                "<c r=\"{}{}\" t=\"s\"{}><v>{}</v></c>",
                column_name(c),
                row_num,
                style,
                strings.intern(value)
            ));
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn content_types_xml(sheet_count: usize) -> String {
    let mut xml = format!(
        "{}<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
         <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
         <Override PartName=\"/xl/workbook.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>\
         <Override PartName=\"/xl/sharedStrings.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml\"/>\
         <Override PartName=\"/xl/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml\"/>",
        XML_DECL
    );
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            "<Override PartName=\"/xl/worksheets/sheet{}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>",
            i
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn root_rels_xml() -> String {
    format!(
        "{}<Relationships xmlns=\"{}\"><Relationship Id=\"rId1\" Type=\"{}/officeDocument\" Target=\"xl/workbook.xml\"/></Relationships>",
        XML_DECL, NS_PKG_REL, NS_REL
    )
}

fn workbook_xml(sheets: &[Sheet]) -> String {
    let mut xml = format!(
        "{}<workbook xmlns=\"{}\" xmlns:r=\"{}\"><sheets>",
        XML_DECL, NS_MAIN, NS_REL
    );
    for (i, sheet) in sheets.iter().enumerate() {
        xml.push_str(&format!(
            "<sheet name=\"{}\" sheetId=\"{}\" r:id=\"rId{}\"/>",
            escape(sheet.name.as_str()),
            i + 1,
            i + 1
        ));
    }
    xml.push_str("</sheets></workbook>");
    xml
}

fn workbook_rels_xml(sheet_count: usize) -> String {
    let mut xml = format!("{}<Relationships xmlns=\"{}\">", XML_DECL, NS_PKG_REL);
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"{}/worksheet\" Target=\"worksheets/sheet{}.xml\"/>",
            i, NS_REL, i
        ));
    }
    xml.push_str(&format!(
        "<Relationship Id=\"rId{}\" Type=\"{}/sharedStrings\" Target=\"sharedStrings.xml\"/>\
         <Relationship Id=\"rId{}\" Type=\"{}/styles\" Target=\"styles.xml\"/>",
        sheet_count + 1,
        NS_REL,
        sheet_count + 2,
        NS_REL
    ));
    xml.push_str("</Relationships>");
    xml
}

fn styles_xml() -> String {
    format!(
        "{}<styleSheet xmlns=\"{}\">\
         <fonts count=\"2\"><font><sz val=\"11\"/><name val=\"Calibri\"/></font><font><b/><sz val=\"11\"/><name val=\"Calibri\"/></font></fonts>\
         <fills count=\"2\"><fill><patternFill patternType=\"none\"/></fill><fill><patternFill patternType=\"gray125\"/></fill></fills>\
         <borders count=\"1\"><border><left/><right/><top/><bottom/><diagonal/></border></borders>\
         <cellStyleXfs count=\"1\"><xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\"/></cellStyleXfs>\
         <cellXfs count=\"2\"><xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\"/>\
         <xf numFmtId=\"0\" fontId=\"1\" fillId=\"0\" borderId=\"0\" xfId=\"0\" applyFont=\"1\"/></cellXfs>\
         </styleSheet>",
        XML_DECL, NS_MAIN
    )
}

fn zip_err(e: impl std::fmt::Display) -> ReportError {
    ReportError::export(ExportFormat::Xlsx, e.to_string())
}

/// Serialize sheets into workbook bytes.
pub fn write_workbook(sheets: &[Sheet]) -> Result<Vec<u8>, ReportError> {
    let mut strings = SharedStrings::default();
    let sheet_parts: Vec<String> = sheets.iter().map(|s| sheet_xml(s, &mut strings)).collect();

    let mut parts: Vec<(String, String)> = vec![
        ("[Content_Types].xml".into(), content_types_xml(sheets.len())),
        ("_rels/.rels".into(), root_rels_xml()),
        ("xl/workbook.xml".into(), workbook_xml(sheets)),
        ("xl/_rels/workbook.xml.rels".into(), workbook_rels_xml(sheets.len())),
        ("xl/styles.xml".into(), styles_xml()),
        ("xl/sharedStrings.xml".into(), strings.to_xml()),
    ];
    for (i, xml) in sheet_parts.into_iter().enumerate() {
        parts.push((format!("xl/worksheets/sheet{}.xml", i + 1), xml));
    }

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, xml) in &parts {
        zip.start_file(name.as_str(), options).map_err(zip_err)?;
        zip.write_all(xml.as_bytes()).map_err(zip_err)?;
    }
    let cursor = zip.finish().map_err(zip_err)?;
    Ok(cursor.into_inner())
}

pub fn export_xlsx(report: &Report) -> Result<Vec<u8>, ReportError> {
    write_workbook(&build_sheets(report))
}
