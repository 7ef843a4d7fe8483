//! Word-processor rendering of an assembled SOP.
//!
//! Layout: 1" margins, centered bold underlined title, a spacer paragraph, then
//! for each section a bold heading and one justified paragraph per body
//! paragraph. CPU-bound; callers run it on the blocking pool.

use std::io::Cursor;

use docx_rs::{AlignmentType, Docx, PageMargin, Paragraph, Run};

use crate::export::ExportError;
use crate::models::AssembledDocument;

pub const DOCUMENT_TITLE: &str = "STATEMENT OF PURPOSE";

/// One inch in twentieths of a point.
const INCH_TWIPS: i32 = 1440;
/// Run sizes are in half-points.
const TITLE_SIZE: usize = 30;
const BODY_SIZE: usize = 26;

pub fn render_docx(document: &AssembledDocument) -> Result<Vec<u8>, ExportError> {
    let mut docx = Docx::new()
        .page_margin(
            PageMargin::new()
                .top(INCH_TWIPS)
                .bottom(INCH_TWIPS)
                .left(INCH_TWIPS)
                .right(INCH_TWIPS),
        )
        .add_paragraph(
            Paragraph::new()
                .add_run(
                    Run::new()
                        .add_text(DOCUMENT_TITLE)
                        .bold()
                        .underline("single")
                        .size(TITLE_SIZE),
                )
                .align(AlignmentType::Center),
        )
        .add_paragraph(Paragraph::new());

    for section in &document.sections {
        if !section.title.is_empty() {
            docx = docx.add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text(&section.title).bold().size(BODY_SIZE))
                    .align(AlignmentType::Left),
            );
        }
        for paragraph in section.paragraphs() {
            docx = docx.add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text(paragraph).size(BODY_SIZE))
                    .align(AlignmentType::Both),
            );
        }
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| ExportError::Docx(e.to_string()))?;
    Ok(buffer.into_inner())
}
