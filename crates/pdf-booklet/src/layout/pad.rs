//! Padding documents to whole signatures

use crate::constants::MAX_SIGNATURE_SIZE;
use crate::document::{Page, PageSequence};
use crate::types::{BookletError, Result};

/// Number of blank pages needed to reach a multiple of `signature_size`.
pub fn padding_needed(page_count: usize, signature_size: usize) -> usize {
    if signature_size == 0 {
        return 0;
    }
    match page_count % signature_size {
        0 => 0,
        remainder => signature_size - remainder,
    }
}

/// Extend `doc` with blank pages until its length is a multiple of
/// `signature_size`.
///
/// Blank pages copy the MediaBox and rotation of the first page. A document
/// that is already aligned, including the empty document, is returned
/// unchanged.
pub fn pad<C>(doc: PageSequence<C>, signature_size: usize) -> Result<PageSequence<C>> {
    if signature_size == 0 || signature_size > MAX_SIGNATURE_SIZE {
        return Err(BookletError::InvariantViolation(format!(
            "signature size must be between 1 and {}, got {}",
            MAX_SIGNATURE_SIZE, signature_size
        )));
    }

    let blanks = padding_needed(doc.len(), signature_size);
    if blanks == 0 {
        return Ok(doc);
    }

    let (media_box, rotation) = doc
        .get(0)
        .and_then(|first| Some((first.media_box()?, first.rotation())))
        .ok_or_else(|| {
            BookletError::MalformedDocument(
                "first page has no usable MediaBox, cannot size blank pages".to_string(),
            )
        })?;

    log::debug!(
        "Padding {} pages with {} blank pages ({} x {} pt)",
        doc.len(),
        blanks,
        media_box.width(),
        media_box.height()
    );

    let mut pages = doc.into_pages();
    pages.extend((0..blanks).map(|_| Page::blank(media_box).with_rotation(rotation)));
    Ok(PageSequence::new(pages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MediaBox, Rotation};

    fn labeled(count: usize) -> PageSequence<usize> {
        (0..count)
            .map(|label| Page::new(label, Some(MediaBox::new(420.0, 595.0))))
            .collect()
    }

    #[test]
    fn test_padding_needed() {
        assert_eq!(padding_needed(0, 8), 0);
        assert_eq!(padding_needed(5, 8), 3);
        assert_eq!(padding_needed(8, 8), 0);
        assert_eq!(padding_needed(9, 8), 7);
        assert_eq!(padding_needed(3, 4), 1);
    }

    #[test]
    fn test_pad_appends_blanks_with_first_page_size() {
        let padded = pad(labeled(5), 8).unwrap();
        assert_eq!(padded.len(), 8);

        for page in &padded.pages()[5..] {
            assert!(page.is_blank());
            assert_eq!(page.media_box(), Some(MediaBox::new(420.0, 595.0)));
        }
    }

    #[test]
    fn test_pad_preserves_content() {
        let original = labeled(11);
        let padded = pad(original.clone(), 8).unwrap();
        assert_eq!(&padded.pages()[..11], original.pages());
    }

    #[test]
    fn test_pad_count_law() {
        for count in 0..40 {
            let padded = pad(labeled(count), 8).unwrap();
            assert_eq!(padded.len() % 8, 0, "count {count}");
            assert!(padded.len() - count < 8, "count {count}");
        }
    }

    #[test]
    fn test_pad_is_idempotent() {
        for count in 0..20 {
            let once = pad(labeled(count), 8).unwrap();
            let twice = pad(once.clone(), 8).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_pad_empty_document() {
        let padded = pad(PageSequence::<usize>::empty(), 8).unwrap();
        assert!(padded.is_empty());
    }

    #[test]
    fn test_pad_missing_media_box() {
        let doc = PageSequence::new(vec![Page::new(0usize, None), Page::new(1, None)]);
        match pad(doc, 8) {
            Err(BookletError::MalformedDocument(_)) => {}
            other => panic!("Expected MalformedDocument, got {:?}", other),
        }
    }

    #[test]
    fn test_pad_aligned_document_without_media_box() {
        // Nothing to pad, so the missing size is never needed
        let doc: PageSequence<usize> = (0..8).map(|i| Page::new(i, None)).collect();
        assert_eq!(pad(doc, 8).unwrap().len(), 8);
    }

    #[test]
    fn test_pad_zero_signature_size() {
        assert!(matches!(
            pad(labeled(3), 0),
            Err(BookletError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_pad_rejects_huge_signature_size() {
        assert!(matches!(
            pad(labeled(3), usize::MAX),
            Err(BookletError::InvariantViolation(_))
        ));
        assert!(matches!(
            pad(labeled(3), MAX_SIGNATURE_SIZE + 4),
            Err(BookletError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_pad_blanks_follow_first_page_rotation() {
        let doc = PageSequence::new(vec![
            Page::new(0usize, Some(MediaBox::new(420.0, 595.0)))
                .with_rotation(Rotation::Clockwise90),
        ]);
        let padded = pad(doc, 4).unwrap();
        for page in &padded.pages()[1..] {
            assert!(page.is_blank());
            assert_eq!(page.rotation(), Rotation::Clockwise90);
        }
    }
}
