//! Sheet rendering for imposition

use crate::constants::*;
use crate::document::PageSequence;
use crate::layout::{CellPlacement, Rect, SheetLayout, placement_transform};
use crate::options::BookletConfig;
use crate::pages::page_resources;
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

use super::xobject::create_page_xobject;

/// Writes planned sheets into a new PDF document.
pub struct BookletRenderer<'a> {
    source: &'a Document,
    config: &'a BookletConfig,
    output: Document,
    pages_tree_id: ObjectId,
    page_refs: Vec<Object>,
    object_cache: HashMap<ObjectId, ObjectId>,
    xobject_cache: HashMap<ObjectId, ObjectId>,
    font_id: Option<ObjectId>,
}

impl<'a> BookletRenderer<'a> {
    pub fn new(source: &'a Document, config: &'a BookletConfig) -> Self {
        let mut output = Document::with_version("1.7");
        let pages_tree_id = output.new_object_id();
        Self {
            source,
            config,
            output,
            pages_tree_id,
            page_refs: Vec::new(),
            object_cache: HashMap::new(),
            xobject_cache: HashMap::new(),
            font_id: None,
        }
    }

    /// Render one sheet as the next page of the output.
    ///
    /// `pages` is the physically ordered sequence the sheet was planned from.
    pub fn render_sheet(
        &mut self,
        sheet: &SheetLayout,
        pages: &PageSequence<ObjectId>,
    ) -> Result<ObjectId> {
        let mut content_ops = Vec::new();
        let mut xobjects = Dictionary::new();
        let mut fonts = Dictionary::new();

        for cell in &sheet.cells {
            let page = pages.get(cell.source).ok_or_else(|| {
                BookletError::InvariantViolation(format!(
                    "sheet {} refers to page {} of {}",
                    sheet.number,
                    cell.source,
                    pages.len()
                ))
            })?;

            // Blank filler pages only get their border
            if let Some(&page_id) = page.content() {
                let xobject_name = format!("P{}", cell.index);
                let xobject_id = self.page_xobject(page_id, cell)?;
                xobjects.set(xobject_name.as_bytes(), Object::Reference(xobject_id));
                content_ops.push(placement_ops(&xobject_name, cell, sheet.height));
            }

            if self.config.draw_borders {
                content_ops.push(border_ops(
                    &cell.rect.to_pdf_space(sheet.height),
                    self.config.border_width_pt,
                ));
            }
        }

        if self.config.annotate_sheets {
            fonts.set(ANNOTATION_FONT_NAME, Object::Reference(self.annotation_font()));
            content_ops.push(annotation_ops(
                &sheet.annotation(),
                sheet.width,
                sheet.height,
                self.config.annotation_font_size,
            ));
        }

        let mut resources = Dictionary::new();
        resources.set("XObject", Object::Dictionary(xobjects));
        if !fonts.is_empty() {
            resources.set("Font", Object::Dictionary(fonts));
        }

        let content = content_ops.join("");
        let content_id = self
            .output
            .add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(self.pages_tree_id));
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(sheet.width),
                Object::Real(sheet.height),
            ]),
        );
        page_dict.set("Contents", Object::Reference(content_id));
        page_dict.set("Resources", Object::Dictionary(resources));

        let page_id = self.output.add_object(page_dict);
        self.page_refs.push(Object::Reference(page_id));

        log::debug!(
            "Rendered sheet {} with {} cells",
            sheet.annotation(),
            sheet.cells.len()
        );
        Ok(page_id)
    }

    /// Create pages tree and catalog, finalize document structure
    pub fn finish(mut self) -> Document {
        let count = self.page_refs.len() as i64;
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(self.page_refs)),
            ("Count", Object::Integer(count)),
        ]);
        self.output
            .objects
            .insert(self.pages_tree_id, Object::Dictionary(pages_dict));

        let catalog_id = self.output.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_tree_id)),
        ]));

        self.output.trailer.set("Root", catalog_id);
        self.output
    }

    fn page_xobject(&mut self, page_id: ObjectId, cell: &CellPlacement) -> Result<ObjectId> {
        if let Some(&xobject_id) = self.xobject_cache.get(&page_id) {
            return Ok(xobject_id);
        }

        let resources = page_resources(self.source, page_id)?;
        let xobject_id = create_page_xobject(
            &mut self.output,
            self.source,
            page_id,
            cell.media_box,
            resources,
            &mut self.object_cache,
        )?;
        self.xobject_cache.insert(page_id, xobject_id);
        Ok(xobject_id)
    }

    fn annotation_font(&mut self) -> ObjectId {
        if let Some(font_id) = self.font_id {
            return font_id;
        }

        let mut font_dict = Dictionary::new();
        font_dict.set("Type", Object::Name(b"Font".to_vec()));
        font_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
        font_dict.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
        let font_id = self.output.add_object(font_dict);
        self.font_id = Some(font_id);
        font_id
    }
}

/// Draw a page XObject into its cell, clipped to the cell bounds.
fn placement_ops(xobject_name: &str, cell: &CellPlacement, sheet_height: f32) -> String {
    let clip = cell.rect.to_pdf_space(sheet_height);
    let content = cell.content.to_pdf_space(sheet_height);
    let transform = placement_transform(
        cell.media_box,
        cell.content_rotation,
        cell.scale,
        content.x,
        content.y,
    );
    format!(
        "q {} {} {} {} re W n {} cm /{} Do Q\n",
        clip.x,
        clip.y,
        clip.width,
        clip.height,
        transform.to_operands(),
        xobject_name
    )
}

/// Thin black outline of a cell
fn border_ops(rect: &Rect, line_width: f32) -> String {
    if line_width <= 0.0 {
        return String::new();
    }
    format!(
        "q 0 G {} w {} {} {} {} re S Q\n",
        line_width, rect.x, rect.y, rect.width, rect.height
    )
}

/// Sheet number near the top right corner, rotated to run up the edge
fn annotation_ops(text: &str, sheet_width: f32, sheet_height: f32, font_size: f32) -> String {
    let x = sheet_width - ANNOTATION_RIGHT_INSET;
    let y = sheet_height - ANNOTATION_TOP_INSET;
    format!(
        "BT /{} {} Tf {} g 0 1 -1 0 {} {} Tm ({}) Tj ET\n",
        ANNOTATION_FONT_NAME,
        font_size,
        ANNOTATION_GRAY,
        x,
        y,
        escape_text(text)
    )
}

/// Escape a string for use in a PDF literal string
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '(' | ')' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_ops() {
        let ops = annotation_ops("2/5", 595.0, 842.0, 5.0);
        assert_eq!(ops, "BT /F1 5 Tf 0.3 g 0 1 -1 0 592 822 Tm (2/5) Tj ET\n");
    }

    #[test]
    fn test_border_ops() {
        let ops = border_ops(&Rect::new(0.0, 631.5, 297.5, 210.5), 0.5);
        assert_eq!(ops, "q 0 G 0.5 w 0 631.5 297.5 210.5 re S Q\n");
        assert!(border_ops(&Rect::new(0.0, 0.0, 1.0, 1.0), 0.0).is_empty());
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("1/2"), "1/2");
        assert_eq!(escape_text("a(b)\\"), "a\\(b\\)\\\\");
    }
}
