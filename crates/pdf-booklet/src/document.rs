//! Backend-independent document model
//!
//! The booklet stages only need to know how many pages a document has and
//! how large each page is. Content is carried as an opaque handle `C` so the
//! same padding, reordering and layout code runs on PDF page ids in
//! production and on plain labels in tests.

use crate::types::{MediaBox, Rotation};

/// One page of a document
#[derive(Debug, Clone, PartialEq)]
pub struct Page<C> {
    content: Option<C>,
    media_box: Option<MediaBox>,
    /// Clockwise rotation applied when the page is displayed (`/Rotate`)
    rotation: Rotation,
}

impl<C> Page<C> {
    pub fn new(content: C, media_box: Option<MediaBox>) -> Self {
        Self {
            content: Some(content),
            media_box,
            rotation: Rotation::None,
        }
    }

    /// A filler page with no content
    pub fn blank(media_box: MediaBox) -> Self {
        Self {
            content: None,
            media_box: Some(media_box),
            rotation: Rotation::None,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn content(&self) -> Option<&C> {
        self.content.as_ref()
    }

    pub fn media_box(&self) -> Option<MediaBox> {
        self.media_box
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn is_blank(&self) -> bool {
        self.content.is_none()
    }
}

/// An ordered sequence of pages
///
/// Order is reading order until the signature reorder, physical print order
/// afterwards. Stages take a sequence by value and return a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSequence<C> {
    pages: Vec<Page<C>>,
}

impl<C> PageSequence<C> {
    pub fn new(pages: Vec<Page<C>>) -> Self {
        Self { pages }
    }

    pub fn empty() -> Self {
        Self { pages: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Page<C>> {
        self.pages.get(index)
    }

    pub fn pages(&self) -> &[Page<C>] {
        &self.pages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Page<C>> {
        self.pages.iter()
    }

    pub fn into_pages(self) -> Vec<Page<C>> {
        self.pages
    }
}

impl<C> FromIterator<Page<C>> for PageSequence<C> {
    fn from_iter<I: IntoIterator<Item = Page<C>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<C> IntoIterator for PageSequence<C> {
    type Item = Page<C>;
    type IntoIter = std::vec::IntoIter<Page<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.into_iter()
    }
}

impl<'a, C> IntoIterator for &'a PageSequence<C> {
    type Item = &'a Page<C>;
    type IntoIter = std::slice::Iter<'a, Page<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}
