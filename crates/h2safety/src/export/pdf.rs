use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::borrow::Cow;
use std::io::BufWriter;

use super::header_lines;
use crate::error::{H2Error, H2Result};
use crate::models::Report;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const TOP: f32 = 277.0;
const LINE_HEIGHT: f32 = 5.5;
const WRAP_AT: usize = 90;

/// Reduce text to plain ASCII for the builtin Helvetica encoding.
///
/// Punctuation and symbols common in engineering prose get a readable
/// stand-in; anything else outside ASCII becomes `?`.
fn builtin_font_text(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let replacement = match c {
            c if c.is_ascii() => {
                out.push(c);
                continue;
            }
            '\u{2010}'..='\u{2015}' | '\u{2212}' => "-",
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => "'",
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => "\"",
            '\u{2026}' => "...",
            '\u{2022}' | '\u{00B7}' => "*",
            '\u{00A0}' | '\u{2009}' | '\u{202F}' => " ",
            '\u{2265}' => ">=",
            '\u{2264}' => "<=",
            '\u{2260}' => "!=",
            '\u{2248}' => "~",
            '\u{00B1}' => "+/-",
            '\u{00D7}' => "x",
            '\u{00B0}' => "deg",
            '\u{00A7}' => "Sec.",
            '\u{00B5}' | '\u{03BC}' => "u",
            '\u{2192}' => "->",
            '\u{2070}' | '\u{2080}' => "0",
            '\u{00B9}' | '\u{2081}' => "1",
            '\u{00B2}' | '\u{2082}' => "2",
            '\u{00B3}' | '\u{2083}' => "3",
            '\u{2074}' | '\u{2084}' => "4",
            _ => "?",
        };
        out.push_str(replacement);
    }
    Cow::Owned(out)
}

/// Greedy word wrap; each input line is wrapped on its own
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.chars().count() <= max_chars {
            lines.push(paragraph.to_string());
            continue;
        }
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let needed = current.chars().count() + word.chars().count() + 1;
            if !current.is_empty() && needed > max_chars {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

fn pdf_error(e: impl std::fmt::Display) -> H2Error {
    H2Error::Internal(format!("Failed to generate PDF: {}", e))
}

/// A4 pages, Helvetica, header then wrapped content; new pages as needed
pub fn render_pdf(report: &Report) -> H2Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        &report.title,
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    let mut current_layer = doc.get_page(page).get_layer(layer);
    let mut y = TOP;

    let [title, kind, project, content_label] =
        header_lines(report).map(|line| builtin_font_text(&line).into_owned());
    current_layer.use_text(title, 20.0, Mm(MARGIN), Mm(y), &font_bold);
    y -= 12.0;
    for line in [kind, project] {
        current_layer.use_text(line, 12.0, Mm(MARGIN), Mm(y), &font);
        y -= LINE_HEIGHT + 1.0;
    }
    y -= 4.0;
    current_layer.use_text(content_label, 12.0, Mm(MARGIN), Mm(y), &font);
    y -= LINE_HEIGHT + 2.0;

    for line in wrap_text(&builtin_font_text(&report.content), WRAP_AT) {
        if y < MARGIN {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            current_layer = doc.get_page(page).get_layer(layer);
            y = TOP;
        }
        current_layer.use_text(line, 11.0, Mm(MARGIN), Mm(y), &font);
        y -= LINE_HEIGHT;
    }

    let mut bytes = Vec::new();
    let mut writer = BufWriter::new(&mut bytes);
    doc.save(&mut writer).map_err(pdf_error)?;
    writer.into_inner().map_err(pdf_error)?;
    Ok(bytes)
}
