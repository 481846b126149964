use std::fmt::Display;
use std::io::{Cursor, Read, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::{CertificateData, CertificateRenderer};
use crate::domain::errors::{PortalError, PortalResult};

/// Longest placeholder text between the braces that is still considered a key
const MAX_KEY_LEN: usize = 64;

/// Fills `{{ key }}` placeholders in the Word template
pub struct DocxRenderer;

impl CertificateRenderer for DocxRenderer {
    fn content_type(&self) -> &'static str {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    }

    fn extension(&self) -> &'static str {
        "docx"
    }

    fn render(&self, template: &[u8], data: &CertificateData) -> PortalResult<Vec<u8>> {
        let mut archive = ZipArchive::new(Cursor::new(template)).map_err(render_error)?;
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for index in 0..archive.len() {
            let mut file = archive.by_index(index).map_err(render_error)?;
            let name = file.name().to_string();

            if !is_text_part(&name) {
                writer.raw_copy_file(file).map_err(render_error)?;
                continue;
            }

            let mut xml = String::new();
            file.read_to_string(&mut xml).map_err(render_error)?;
            let filled = fill_placeholders(&xml, |key| placeholder_value(data, key));

            let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
            writer.start_file(name, options).map_err(render_error)?;
            writer.write_all(filled.as_bytes()).map_err(render_error)?;
        }

        let output = writer.finish().map_err(render_error)?;
        Ok(output.into_inner())
    }
}

fn is_text_part(name: &str) -> bool {
    name == "word/document.xml"
        || (name.ends_with(".xml") && (name.starts_with("word/header") || name.starts_with("word/footer")))
}

fn placeholder_value(data: &CertificateData, key: &str) -> Option<String> {
    let value = match key {
        "correlativo" => &data.correlative,
        "nombre" => &data.full_name,
        "facultad" => &data.faculty,
        "escuela" => &data.school,
        "grado" => &data.degree,
        "fecha" => &data.date_words,
        _ => return None,
    };
    Some(value.clone())
}

/// Replace every `{{ key }}` that `lookup` knows, even when Word has split the
/// placeholder across several runs. The markup between the braces is dropped
/// with the placeholder; unknown keys are left untouched.
pub fn fill_placeholders(xml: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    // Text outside tags, with the byte offset of each text byte in `xml`
    let mut text = Vec::new();
    let mut offsets = Vec::new();
    let mut in_tag = false;
    for (offset, &byte) in xml.as_bytes().iter().enumerate() {
        match byte {
            b'<' => in_tag = true,
            b'>' if in_tag => in_tag = false,
            _ if !in_tag => {
                text.push(byte);
                offsets.push(offset);
            }
            _ => {}
        }
    }

    let mut output = String::with_capacity(xml.len());
    let mut copied = 0;
    let mut cursor = 0;

    while let Some(open) = find(&text, b"{{", cursor) {
        let Some(close) = find(&text, b"}}", open + 2) else {
            break;
        };
        cursor = close + 2;

        if close - open - 2 > MAX_KEY_LEN {
            continue;
        }
        let key = String::from_utf8_lossy(&text[open + 2..close]);
        if let Some(value) = lookup(key.trim()) {
            let start = offsets[open];
            let end = offsets[close + 1] + 1;
            output.push_str(&xml[copied..start]);
            output.push_str(&escape_xml(&value));
            copied = end;
        }
    }

    output.push_str(&xml[copied..]);
    output
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|position| position + from)
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn render_error(e: impl Display) -> PortalError {
    PortalError::Render(e.to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#;

    /// Minimal package whose document body holds `runs` inside one paragraph
    pub(crate) fn template_with_body(runs: &str) -> Vec<u8> {
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r>{}</w:r></w:p></w:body></w:document>"#,
            runs
        );
        let footer = r#"<w:ftr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:p><w:r><w:t>{{ correlativo }}</w:t></w:r></w:p></w:ftr>"#;

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, body) in [
            ("[Content_Types].xml", CONTENT_TYPES),
            ("word/document.xml", document.as_str()),
            ("word/footer1.xml", footer),
            ("word/styles.xml", "<w:styles>{{ nombre }}</w:styles>"),
        ] {
            writer.start_file(name, options).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    pub(crate) fn read_part(package: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(package)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut xml = String::new();
        file.read_to_string(&mut xml).unwrap();
        xml
    }

    fn data() -> CertificateData {
        CertificateData {
            voucher: "V100".to_string(),
            correlative: "001-2025-UB/DBU-UNAP".to_string(),
            full_name: "PEREZ & RUIZ, ANA".to_string(),
            faculty: "DERECHO".to_string(),
            school: "DERECHO".to_string(),
            degree: "BACHILLER".to_string(),
            place: "San Juan Bautista".to_string(),
            date_words: "5 de marzo de 2025".to_string(),
        }
    }

    #[test]
    fn test_placeholder_split_across_runs() {
        let xml = "<w:r><w:t>{{ nom</w:t></w:r><w:r><w:t>bre }}</w:t></w:r>";
        let filled = fill_placeholders(xml, |key| (key == "nombre").then(|| "ANA".to_string()));
        assert_eq!(filled, "<w:r><w:t>ANA</w:t></w:r>");
    }

    #[test]
    fn test_split_braces_are_recognized() {
        let xml = "<w:t>{</w:t><w:t>{grado}</w:t><w:t>} fin</w:t>";
        let filled = fill_placeholders(xml, |key| (key == "grado").then(|| "BACHILLER".to_string()));
        assert_eq!(filled, "<w:t>BACHILLER fin</w:t>");
    }

    #[test]
    fn test_unknown_keys_are_left_alone() {
        let xml = "<w:t>{{ firma }} y {{ fecha }}</w:t>";
        let filled = fill_placeholders(xml, |key| (key == "fecha").then(|| "hoy".to_string()));
        assert_eq!(filled, "<w:t>{{ firma }} y hoy</w:t>");
    }

    #[test]
    fn test_render_fills_body_and_footer_only() {
        let template = template_with_body("<w:t>{{ nombre }} - {{ grado }}</w:t>");

        let output = DocxRenderer.render(&template, &data()).unwrap();

        let document = read_part(&output, "word/document.xml");
        assert!(document.contains("<w:t>PEREZ &amp; RUIZ, ANA - BACHILLER</w:t>"));
        let footer = read_part(&output, "word/footer1.xml");
        assert!(footer.contains("001-2025-UB/DBU-UNAP"));
        let styles = read_part(&output, "word/styles.xml");
        assert!(styles.contains("{{ nombre }}"));
        assert_eq!(read_part(&output, "[Content_Types].xml"), CONTENT_TYPES);
    }

    #[test]
    fn test_not_a_zip_is_a_render_error() {
        let err = DocxRenderer.render(b"plain text", &data()).unwrap_err();
        assert!(matches!(err, PortalError::Render(_)));
    }
}
