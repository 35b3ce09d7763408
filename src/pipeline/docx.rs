//! Document text extraction: DOCX bytes → visible paragraph text.
//!
//! Only body-level paragraphs count. Tables and text boxes are structural
//! decoration for a travel diary, so their paragraphs are skipped, as are
//! paragraphs that are blank after trimming.
//!
//! ```text
//! Document
//!   └── DocumentChild::Paragraph
//!         └── ParagraphChild::Run (or a Hyperlink wrapping runs)
//!               └── RunChild::Text │ Tab │ Break
//! ```

use crate::error::DocumentParseError;
use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, Run, RunChild};
use tracing::debug;

/// Extract the non-blank body paragraphs of a DOCX, joined by `\n`.
pub fn extract_text(bytes: &[u8]) -> Result<String, DocumentParseError> {
    let docx = read_docx(bytes).map_err(|e| DocumentParseError(format!("not a readable DOCX: {e}")))?;

    let kept: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .filter(|p| !p.trim().is_empty())
        .collect();

    debug!("DOCX: kept {} non-empty paragraphs", kept.len());
    Ok(kept.join("\n"))
}

/// Concatenate every run of a paragraph; runs are fragments of one line.
fn paragraph_text(para: &Paragraph) -> String {
    let mut out = String::new();
    push_children(&para.children, &mut out);
    out
}

fn push_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(run, out),
            ParagraphChild::Hyperlink(link) => push_children(&link.children, out),
            _ => {}
        }
    }
}

fn push_run(run: &Run, out: &mut String) {
    for rc in &run.children {
        match rc {
            RunChild::Text(t) => out.push_str(&t.text),
            RunChild::Tab(_) => out.push('\t'),
            RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Table, TableCell, TableRow};
    use std::io::Cursor;

    fn pack(docx: Docx) -> Vec<u8> {
        let mut buf = Vec::new();
        docx.build().pack(Cursor::new(&mut buf)).unwrap();
        buf
    }

    fn para(text: &str) -> Paragraph {
        Paragraph::new().add_run(Run::new().add_text(text))
    }

    #[test]
    fn keeps_non_empty_paragraphs_in_order() {
        let doc = Docx::new()
            .add_paragraph(para("Day 1 at the lake"))
            .add_paragraph(para("   "))
            .add_paragraph(Paragraph::new())
            .add_paragraph(para("Sunset was beautiful"));
        let text = extract_text(&pack(doc)).unwrap();
        assert_eq!(text, "Day 1 at the lake\nSunset was beautiful");
    }

    #[test]
    fn joins_runs_and_tabs() {
        let doc = Docx::new().add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text("Fish & "))
                .add_run(Run::new().add_text("chips").bold())
                .add_run(Run::new().add_tab().add_text("£4")),
        );
        let text = extract_text(&pack(doc)).unwrap();
        assert_eq!(text, "Fish & chips\t£4");
    }

    #[test]
    fn skips_table_cells() {
        let table = Table::new(vec![TableRow::new(vec![
            TableCell::new().add_paragraph(para("cell"))
        ])]);
        let doc = Docx::new()
            .add_paragraph(para("Before"))
            .add_table(table)
            .add_paragraph(para("After"));
        let text = extract_text(&pack(doc)).unwrap();
        assert_eq!(text, "Before\nAfter");
    }

    #[test]
    fn empty_document_yields_empty_string() {
        let text = extract_text(&pack(Docx::new())).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn rejects_bytes_that_are_not_a_docx() {
        let err = extract_text(b"plain text pretending to be docx").unwrap_err();
        assert!(err.to_string().contains("not a readable DOCX"), "got: {err}");
    }
}
