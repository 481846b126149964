use std::fmt::Display;

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use super::{CertificateData, CertificateRenderer};
use crate::domain::errors::{PortalError, PortalResult};

/// Writes the certificate text over page 1 of the background template
pub struct PdfRenderer;

#[derive(Debug, Clone, Copy)]
enum FontSlot {
    Title,
    Bold,
    Regular,
}

impl FontSlot {
    const ALL: [FontSlot; 3] = [FontSlot::Title, FontSlot::Bold, FontSlot::Regular];

    /// Resource names unlikely to collide with the template's own fonts
    fn resource_name(self) -> &'static str {
        match self {
            FontSlot::Title => "CxTitle",
            FontSlot::Bold => "CxBold",
            FontSlot::Regular => "CxRegular",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            FontSlot::Title => "Times-Bold",
            FontSlot::Bold => "Helvetica-Bold",
            FontSlot::Regular => "Helvetica",
        }
    }
}

const TITLE_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 12.0;
const TITLE_X: f32 = 180.0;
const TITLE_Y: f32 = 700.0;

impl CertificateRenderer for PdfRenderer {
    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, template: &[u8], data: &CertificateData) -> PortalResult<Vec<u8>> {
        let mut doc = Document::load_mem(template).map_err(render_error)?;
        let page_id = *doc
            .get_pages()
            .get(&1)
            .ok_or_else(|| PortalError::Render("la plantilla no tiene páginas".to_string()))?;

        let mut resources = inherited_resources(&doc, page_id)?;
        let mut fonts = resources
            .get(b"Font")
            .ok()
            .and_then(|fonts| resolve_dict(&doc, fonts))
            .unwrap_or_else(Dictionary::new);
        for slot in FontSlot::ALL {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => slot.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(slot.resource_name(), Object::Reference(font_id));
        }
        resources.set("Font", Object::Dictionary(fonts));

        // Isolate the template's graphics state from the overlay
        let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let mut overlay = b"Q\n".to_vec();
        overlay.extend(overlay_content(data));
        let overlay_id = doc.add_object(Stream::new(Dictionary::new(), overlay));

        let mut contents = vec![Object::Reference(save_id)];
        contents.extend(existing_contents(&doc, page_id)?);
        contents.push(Object::Reference(overlay_id));

        let page = doc
            .get_object_mut(page_id)
            .and_then(|object| object.as_dict_mut())
            .map_err(render_error)?;
        page.set("Resources", Object::Dictionary(resources));
        page.set("Contents", Object::Array(contents));

        let mut output = Vec::new();
        doc.save_to(&mut output).map_err(render_error)?;
        Ok(output)
    }
}

fn overlay_content(data: &CertificateData) -> Vec<u8> {
    let title = format!("CONSTANCIA N° {}", data.correlative);
    let underline_end = TITLE_X + text_width(&title, TITLE_SIZE);

    let mut content = Vec::new();
    show_text(&mut content, FontSlot::Title, TITLE_SIZE, TITLE_X, TITLE_Y, &title);
    content.extend(
        format!(
            "1 w {:.2} {:.2} m {:.2} {:.2} l S\n",
            TITLE_X,
            TITLE_Y - 3.0,
            underline_end,
            TITLE_Y - 3.0
        )
        .into_bytes(),
    );
    show_text(&mut content, FontSlot::Bold, BODY_SIZE, 180.0, 656.0, &data.full_name);
    show_text(&mut content, FontSlot::Bold, BODY_SIZE, 180.0, 615.0, &data.faculty);
    show_text(&mut content, FontSlot::Bold, BODY_SIZE, 180.0, 575.0, &data.school);
    show_text(
        &mut content,
        FontSlot::Regular,
        BODY_SIZE,
        280.0,
        430.0,
        &format!("{}, {}.", data.place, data.date_words),
    );
    content
}

fn show_text(content: &mut Vec<u8>, slot: FontSlot, size: f32, x: f32, y: f32, text: &str) {
    content.extend(format!("BT /{} {} Tf {} {} Td (", slot.resource_name(), size, x, y).into_bytes());
    content.extend(encode_literal(text));
    content.extend_from_slice(b") Tj ET\n");
}

/// WinAnsi bytes for a PDF literal string; characters outside Latin-1 become '?'
fn encode_literal(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let byte = u8::try_from(u32::from(ch)).unwrap_or(b'?');
        if matches!(byte, b'(' | b')' | b'\\') {
            bytes.push(b'\\');
        }
        bytes.push(byte);
    }
    bytes
}

/// Rendered width of `text` in Times-Bold at `size` points
fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(times_bold_width).sum();
    units as f32 * size / 1000.0
}

fn times_bold_width(ch: char) -> u32 {
    match ch {
        ' ' | '.' | ',' => 250,
        '-' | 'f' | 'j' | 't' => 333,
        '/' | 'i' | 'l' => 278,
        '0'..='9' => 500,
        '°' => 400,
        'A' | 'C' | 'D' | 'N' | 'R' | 'U' | 'V' | 'X' | 'Y' => 722,
        'B' | 'E' | 'L' | 'T' | 'Z' => 667,
        'F' | 'P' => 611,
        'G' | 'H' | 'K' | 'O' | 'Q' => 778,
        'I' => 389,
        'J' => 500,
        'M' => 944,
        'S' => 556,
        'W' => 1000,
        'b' | 'd' | 'h' | 'k' | 'n' | 'p' | 'q' | 'u' => 556,
        'c' | 'e' | 'r' | 'z' => 444,
        'm' => 833,
        's' => 389,
        'w' => 722,
        _ => 500,
    }
}

/// Page resources, following /Parent when the page inherits them
fn inherited_resources(doc: &Document, page_id: ObjectId) -> PortalResult<Dictionary> {
    let mut current = Some(page_id);
    let mut depth = 0;

    while let Some(id) = current {
        let node = doc.get_dictionary(id).map_err(render_error)?;
        if let Ok(resources) = node.get(b"Resources") {
            return Ok(resolve_dict(doc, resources).unwrap_or_else(Dictionary::new));
        }
        depth += 1;
        if depth > 32 {
            break;
        }
        current = node.get(b"Parent").and_then(|parent| parent.as_reference()).ok();
    }

    Ok(Dictionary::new())
}

fn resolve_dict(doc: &Document, object: &Object) -> Option<Dictionary> {
    match object {
        Object::Dictionary(dict) => Some(dict.clone()),
        Object::Reference(id) => doc.get_dictionary(*id).ok().cloned(),
        _ => None,
    }
}

fn existing_contents(doc: &Document, page_id: ObjectId) -> PortalResult<Vec<Object>> {
    let page = doc.get_dictionary(page_id).map_err(render_error)?;

    Ok(match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    })
}

fn render_error(e: impl Display) -> PortalError {
    PortalError::Render(e.to_string())
}
