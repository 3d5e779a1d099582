//! crates/study_notes_core/src/export/pdf.rs
//!
//! Draws a laid-out [`Document`] into PDF bytes using the standard Type1
//! fonts, so no font files need to be embedded.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, StringFormat};

use crate::export::document::{Document, Font, Page};
use crate::export::layout::{PAGE_HEIGHT, PAGE_WIDTH};
use crate::export::ExportError;

fn font_resource(font: Font) -> &'static str {
    match font {
        Font::Regular => "F1",
        Font::Bold => "F2",
        Font::Mono => "F3",
    }
}

/// Encodes text for a WinAnsi-encoded standard font. Characters outside the
/// encoding become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' => b' ',
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2026}' => 0x85,
            _ => b'?',
        })
        .collect()
}

fn page_content(page: &Page) -> Content {
    let mut operations = Vec::with_capacity(page.lines.len() * 5);
    for line in &page.lines {
        if line.text.is_empty() {
            continue;
        }
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![
                font_resource(line.style.font).into(),
                Object::Integer(line.style.size.round() as i64),
            ],
        ));
        operations.push(Operation::new(
            "Td",
            vec![
                Object::Integer(line.x.round() as i64),
                Object::Integer((PAGE_HEIGHT - line.baseline).round() as i64),
            ],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(win_ansi(&line.text), StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    Content { operations }
}

/// Serializes the document to PDF bytes.
pub fn render(document: &Document) -> Result<Vec<u8>, ExportError> {
    let mut pdf = lopdf::Document::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for (key, base) in [("F1", "Helvetica"), ("F2", "Helvetica-Bold"), ("F3", "Courier")] {
        let font_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base,
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(key, font_id);
    }
    let resources_id = pdf.add_object(dictionary! {
        "Font" => fonts,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(document.pages.len());
    for page in &document.pages {
        let encoded = page_content(page)
            .encode()
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let content_id = pdf.add_object(lopdf::Stream::new(dictionary! {}, encoded));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(document.pages.len() as i64),
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH as i64),
            Object::Integer(PAGE_HEIGHT as i64),
        ],
    };
    pdf.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);
    pdf.compress();

    let mut bytes = Vec::new();
    pdf.save_to(&mut bytes)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::document::{PlacedLine, TextStyle};

    fn page(texts: &[&str]) -> Page {
        Page {
            lines: texts
                .iter()
                .enumerate()
                .map(|(i, t)| PlacedLine {
                    text: t.to_string(),
                    x: 56.0,
                    baseline: 80.0 + i as f32 * 14.0,
                    style: TextStyle::BODY,
                })
                .collect(),
        }
    }

    #[test]
    fn writes_one_pdf_page_per_layout_page() {
        let document = Document {
            pages: vec![page(&["first"]), page(&["second", "third"]), page(&[])],
        };
        let bytes = render(&document).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let parsed = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 3);
    }

    #[test]
    fn unsupported_characters_are_replaced() {
        assert_eq!(
            win_ansi("caf\u{e9} \u{2014} \u{4e2d}"),
            vec![b'c', b'a', b'f', 0xE9, b' ', 0x97, b' ', b'?']
        );
    }
}
