//! Bridging PDF page trees and [`PageSequence`]
//!
//! Reading flattens the page tree into a sequence of page object IDs with
//! resolved MediaBoxes. Writing installs a sequence as a new, flat page tree
//! in the same document, creating real PDF pages for blank fillers.

use crate::document::{Page, PageSequence};
use crate::layout::{pad, reorder};
use crate::render::media_box_array;
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE_KEYS: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Guard against malformed trees whose Parent links form a cycle
const MAX_TREE_DEPTH: usize = 64;

/// Read the pages of `doc`, in order.
pub fn read_pages(doc: &Document) -> Result<PageSequence<ObjectId>> {
    doc.get_pages()
        .into_values()
        .map(|page_id| -> Result<Page<ObjectId>> {
            Ok(Page::new(page_id, page_media_box(doc, page_id)?)
                .with_rotation(page_rotation(doc, page_id)?))
        })
        .collect()
}

/// Resolved MediaBox of a page, following inheritance.
///
/// Returns `None` when no ancestor defines a usable box.
pub fn page_media_box(doc: &Document, page_id: ObjectId) -> Result<Option<MediaBox>> {
    let Some(obj) = inherited_attribute(doc, page_id, b"MediaBox")? else {
        return Ok(None);
    };
    let values = match resolve(doc, obj)? {
        Object::Array(values) if values.len() == 4 => values,
        _ => return Ok(None),
    };

    let mut corners = [0.0f32; 4];
    for (corner, value) in corners.iter_mut().zip(values) {
        match number(resolve(doc, value)?) {
            Some(n) => *corner = n,
            None => return Ok(None),
        }
    }
    Ok(MediaBox::from_corners(
        corners[0], corners[1], corners[2], corners[3],
    ))
}

/// Display rotation of a page (`/Rotate`), following inheritance.
///
/// Values that are not a multiple of 90 are ignored with a warning.
pub fn page_rotation(doc: &Document, page_id: ObjectId) -> Result<Rotation> {
    let Some(obj) = inherited_attribute(doc, page_id, b"Rotate")? else {
        return Ok(Rotation::None);
    };
    let rotation = match resolve(doc, obj)? {
        Object::Integer(degrees) => Rotation::from_degrees(degrees.rem_euclid(360) as i32),
        _ => None,
    };
    Ok(rotation.unwrap_or_else(|| {
        log::warn!("Page {:?} has an invalid /Rotate, ignoring it", page_id);
        Rotation::None
    }))
}

/// Resources of a page, following inheritance
pub fn page_resources(doc: &Document, page_id: ObjectId) -> Result<Option<&Object>> {
    inherited_attribute(doc, page_id, b"Resources")
}

/// Look up `key` on a page or the closest ancestor that defines it.
fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>> {
    let mut node = doc.get_dictionary(page_id)?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Ok(Some(value));
        }
        match node.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent_id) => node = doc.get_dictionary(parent_id)?,
            Err(_) => return Ok(None),
        }
    }
    Err(BookletError::MalformedDocument(format!(
        "page tree above page {:?} is deeper than {} levels",
        page_id, MAX_TREE_DEPTH
    )))
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Replace the page tree of `doc` with the pages of `pages`, in order.
///
/// Inherited attributes are copied onto each page so the flat tree renders
/// the same. Blank pages become empty PDF pages.
pub fn write_pages(mut doc: Document, pages: &PageSequence<ObjectId>) -> Result<Document> {
    let catalog_id = doc.trailer.get(b"Root")?.as_reference()?;
    let pages_tree_id = doc.new_object_id();
    let mut kids = Vec::with_capacity(pages.len());

    for page in pages {
        let page_id = match (page.content(), page.media_box()) {
            (Some(&page_id), _) => {
                reparent_page(&mut doc, page_id, pages_tree_id)?;
                page_id
            }
            (None, Some(media_box)) => {
                create_blank_page(&mut doc, media_box, page.rotation(), pages_tree_id)
            }
            (None, None) => {
                return Err(BookletError::InvariantViolation(
                    "blank page without a MediaBox".to_string(),
                ));
            }
        };
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(count)),
    ]);
    doc.objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    doc.get_dictionary_mut(catalog_id)?
        .set("Pages", Object::Reference(pages_tree_id));

    // Old intermediate Pages nodes are no longer reachable
    doc.prune_objects();
    Ok(doc)
}

/// Copy inherited attributes onto a page and point it at a new parent
fn reparent_page(doc: &mut Document, page_id: ObjectId, parent_id: ObjectId) -> Result<()> {
    let mut inherited = Vec::new();
    for key in INHERITABLE_KEYS {
        if doc.get_dictionary(page_id)?.has(key) {
            continue;
        }
        if let Some(value) = inherited_attribute(doc, page_id, key)? {
            inherited.push((key, value.clone()));
        }
    }

    let page_dict = doc.get_dictionary_mut(page_id)?;
    for (key, value) in inherited {
        page_dict.set(key, value);
    }
    page_dict.set("Parent", Object::Reference(parent_id));
    Ok(())
}

/// Create a blank page with the given media box and display rotation
fn create_blank_page(
    doc: &mut Document,
    media_box: MediaBox,
    rotation: Rotation,
    parent_id: ObjectId,
) -> ObjectId {
    let content_id = doc.add_object(Stream::new(Dictionary::new(), Vec::new()));

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_id));
    page_dict.set("MediaBox", media_box_array(media_box));
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(Dictionary::new()));
    if rotation != Rotation::None {
        page_dict.set("Rotate", Object::Integer(rotation.degrees().into()));
    }

    doc.add_object(page_dict)
}

/// Pad a PDF with blank pages to a multiple of `signature_size`
pub fn pad_document(doc: Document, signature_size: usize) -> Result<Document> {
    let pages = pad(read_pages(&doc)?, signature_size)?;
    write_pages(doc, &pages)
}

/// Rewrite the page order of a padded PDF into signature printing order
pub fn reorder_document(doc: Document, signature_size: usize) -> Result<Document> {
    let pages = reorder(read_pages(&doc)?, signature_size)?;
    write_pages(doc, &pages)
}
