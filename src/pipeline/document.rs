//! Minimal Office Open XML (`.docx`) writer.
//!
//! A listing is one paragraph in one run: every line of the buffer becomes a
//! text element separated by line breaks, all in the same font and size.

use crate::pipeline::LineBuffer;
use serde::{Deserialize, Serialize};
use std::io::{Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

// A4 portrait with one-inch margins, in twentieths of a point.
const SECTION_XML: &str = r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#;

/// Font settings applied to the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPreset {
    pub font_family: String,
    /// Size in points.
    pub font_size: f32,
}

impl Default for DocumentPreset {
    /// 7pt Microsoft YaHei prints roughly fifty listing lines per A4 page.
    fn default() -> Self {
        Self {
            font_family: "Microsoft YaHei".to_string(),
            font_size: 7.0,
        }
    }
}

impl DocumentPreset {
    /// WordprocessingML sizes are in half-points.
    pub fn half_points(&self) -> u32 {
        ((self.font_size * 2.0).round() as u32).max(1)
    }
}

/// Render `word/document.xml` for `buffer` using `preset`.
pub fn render_document_xml(buffer: &LineBuffer, preset: &DocumentPreset) -> String {
    let font = escape_xml(&preset.font_family);
    let size = preset.half_points();

    let mut xml = String::with_capacity(256 + buffer.len() * 64);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r>"#,
    );
    xml.push_str(&format!(
        r#"<w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:eastAsia="{font}" w:cs="{font}"/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/></w:rPr>"#
    ));

    for (index, line) in buffer.lines().iter().enumerate() {
        if index > 0 {
            xml.push_str("<w:br/>");
        }
        push_line(&mut xml, line);
    }

    xml.push_str("</w:r></w:p>");
    xml.push_str(SECTION_XML);
    xml.push_str("</w:body></w:document>");
    xml
}

/// Write a complete `.docx` package for `buffer` into `writer`.
pub fn write_docx<W: Write + Seek>(
    writer: W,
    buffer: &LineBuffer,
    preset: &DocumentPreset,
) -> zip::result::ZipResult<W> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(ROOT_RELS_XML.as_bytes())?;

    zip.start_file("word/document.xml", options)?;
    zip.write_all(render_document_xml(buffer, preset).as_bytes())?;

    zip.finish()
}

fn push_line(xml: &mut String, line: &str) {
    for (index, segment) in line.split('\t').enumerate() {
        if index > 0 {
            xml.push_str("<w:tab/>");
        }
        if !segment.is_empty() {
            xml.push_str(r#"<w:t xml:space="preserve">"#);
            xml.push_str(&escape_xml(segment));
            xml.push_str("</w:t>");
        }
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            // Not representable in XML 1.0.
            c if (c as u32) < 0x20 && c != '\t' => {}
            '\u{FFFE}' | '\u{FFFF}' => {}
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn buffer(lines: &[&str]) -> LineBuffer {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_half_points() {
        assert_eq!(DocumentPreset::default().half_points(), 14);
        let preset = DocumentPreset {
            font_family: "Consolas".to_string(),
            font_size: 7.5,
        };
        assert_eq!(preset.half_points(), 15);
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(
            escape_xml(r#"if (a < b && c > "d") 'e'"#),
            "if (a &lt; b &amp;&amp; c &gt; &quot;d&quot;) &apos;e&apos;"
        );
        assert_eq!(escape_xml("bell\u{7}"), "bell");
        assert_eq!(escape_xml("a\u{FFFE}b\u{FFFF}c"), "abc");
    }

    #[test]
    fn test_single_paragraph_with_breaks() {
        let xml = render_document_xml(&buffer(&["a", "b", "c"]), &DocumentPreset::default());

        assert_eq!(xml.matches("<w:p>").count(), 1);
        assert_eq!(xml.matches("<w:br/>").count(), 2);
        assert!(xml.contains(r#"w:ascii="Microsoft YaHei""#));
        assert!(xml.contains(r#"<w:sz w:val="14"/>"#));
    }

    #[test]
    fn test_tabs_and_indentation_preserved() {
        let xml = render_document_xml(&buffer(&["\tindent", "    spaces"]), &DocumentPreset::default());
        assert!(xml.contains(r#"<w:tab/><w:t xml:space="preserve">indent</w:t>"#));
        assert!(xml.contains(r#"<w:t xml:space="preserve">    spaces</w:t>"#));
    }

    #[test]
    fn test_package_contains_required_parts() {
        let cursor = write_docx(Cursor::new(Vec::new()), &buffer(&["x"]), &DocumentPreset::default())
            .unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
        for name in ["[Content_Types].xml", "_rels/.rels", "word/document.xml"] {
            assert!(archive.by_name(name).is_ok(), "missing part {}", name);
        }

        let mut document = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut document)
            .unwrap();
        assert!(document.contains(">x</w:t>"));
    }
}
