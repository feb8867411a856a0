//! XObject creation for imposition
//!
//! Source pages are turned into Form XObjects which are then placed onto
//! output sheets with a transformation matrix.

use crate::types::{BookletError, MediaBox, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

// =============================================================================
// XObject Creation
// =============================================================================

/// Create a Form XObject from a source page.
///
/// # Arguments
/// * `output` - The output document to add the XObject to
/// * `source` - The source document containing the page
/// * `page_id` - The object ID of the source page
/// * `media_box` - The resolved MediaBox of the page, used as the BBox
/// * `resources` - The page resources, possibly inherited from the page tree
/// * `cache` - Maps source object IDs to their copies in `output`
pub fn create_page_xobject(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    media_box: MediaBox,
    resources: Option<&Object>,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<ObjectId> {
    let page_dict = source.get_dictionary(page_id)?;
    let content_data = get_page_content(source, page_dict)?;

    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set("BBox", media_box_array(media_box));
    xobject_dict.set("FormType", Object::Integer(1));

    if let Some(resources) = resources {
        xobject_dict.set(
            "Resources",
            copy_object_deep(output, source, resources, cache)?,
        );
    }

    Ok(output.add_object(Stream::new(xobject_dict, content_data)))
}

/// A `/MediaBox`-style array for the given box
pub fn media_box_array(media_box: MediaBox) -> Object {
    Object::Array(vec![
        Object::Real(media_box.x0()),
        Object::Real(media_box.y0()),
        Object::Real(media_box.x0() + media_box.width()),
        Object::Real(media_box.y0() + media_box.height()),
    ])
}

// =============================================================================
// Page Content Extraction
// =============================================================================

/// Get the content stream data from a page.
fn get_page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()), // No content = blank page
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id)? {
            Object::Array(arr) => get_concatenated_content_streams(doc, arr),
            obj => stream_data(obj),
        },
        Object::Array(arr) => get_concatenated_content_streams(doc, arr),
        _ => Ok(Vec::new()),
    }
}

/// Concatenate multiple content streams
fn get_concatenated_content_streams(doc: &Document, refs: &[Object]) -> Result<Vec<u8>> {
    let mut result = Vec::new();

    for obj in refs {
        if let Object::Reference(id) = obj {
            result.extend_from_slice(&stream_data(doc.get_object(*id)?)?);
            result.push(b'\n');
        }
    }

    Ok(result)
}

/// Decoded bytes of a content stream.
///
/// The XObject is written without a filter, so a stream that cannot be
/// decoded is an error rather than raw encoded bytes.
fn stream_data(obj: &Object) -> Result<Vec<u8>> {
    let Ok(stream) = obj.as_stream() else {
        return Ok(Vec::new());
    };
    if !stream.dict.has(b"Filter") {
        return Ok(stream.content.clone());
    }
    stream.decompressed_content().map_err(|e| {
        BookletError::MalformedDocument(format!("cannot decode page content stream: {}", e))
    })
}

// =============================================================================
// Deep Copy
// =============================================================================

/// Deep copy an object from source to output document, following references.
///
/// Each referenced object is copied at most once; the cache entry is made
/// before descending so reference cycles terminate.
pub fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            let new_id = output.new_object_id();
            cache.insert(*id, new_id);

            let referenced = source.get_object(*id)?;
            let copied = copy_object_deep(output, source, referenced, cache)?;
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, cache,
        )?)),
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => Ok(Object::Stream(Stream {
            dict: copy_dictionary(output, source, &stream.dict, cache)?,
            content: stream.content.clone(),
            allows_compression: stream.allows_compression,
            start_position: None,
        })),
        // Primitive types: just clone
        _ => Ok(obj.clone()),
    }
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(new_dict)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_data_plain() {
        let stream = Object::Stream(Stream::new(Dictionary::new(), b"0 0 m".to_vec()));
        assert_eq!(stream_data(&stream).unwrap(), b"0 0 m".to_vec());
    }

    #[test]
    fn test_stream_data_decodes_flate() {
        let mut stream = Stream::new(Dictionary::new(), b"% page 3\n".repeat(20));
        stream.compress().unwrap();
        assert!(stream.dict.has(b"Filter"));
        assert_eq!(
            stream_data(&Object::Stream(stream)).unwrap(),
            b"% page 3\n".repeat(20)
        );
    }

    #[test]
    fn test_stream_data_undecodable() {
        let mut dict = Dictionary::new();
        dict.set("Filter", Object::Name(b"RunLengthDecode".to_vec()));
        let stream = Object::Stream(Stream::new(dict, b"\x02abc\x80".to_vec()));
        assert!(matches!(
            stream_data(&stream),
            Err(BookletError::MalformedDocument(_))
        ));
    }
}
