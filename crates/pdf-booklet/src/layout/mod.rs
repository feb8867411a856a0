//! Layout calculation modules for booklet imposition
//!
//! This module handles all of the page-index and geometric work:
//! - Padding to whole signatures
//! - Signature page ordering (which page is printed where)
//! - Sheet grid layout and content placement

mod grid;
mod pad;
mod placement;
mod signature;

pub use grid::*;
pub use pad::*;
pub use placement::*;
pub use signature::*;
