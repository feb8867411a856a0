//! Signature page ordering
//!
//! A pocket booklet signature is printed 2-up per row on one side of the
//! sheet. For the default 8-page signature the cells read, row by row
//! (1-based reading page numbers):
//!
//! ```text
//! +---+---+
//! | 2 | 1 |
//! +---+---+
//! | 3 | 8 |
//! +---+---+
//! | 4 | 7 |
//! +---+---+
//! | 5 | 6 |
//! +---+---+
//! ```
//!
//! After cutting along the rows, stacking and folding along the centre
//! line, the halves come back in reading order.

use crate::constants::MAX_SIGNATURE_SIZE;
use crate::document::PageSequence;
use crate::types::{BookletError, Result};

/// Physical order of the pages of one signature, as offsets from the
/// signature start.
///
/// For 8 pages this is `[1, 0, 2, 7, 3, 6, 4, 5]`. Larger even sizes keep the
/// same shape: the opening pair, then one row per remaining leaf pairing the
/// next front page with its mirror from the back.
pub fn signature_order(signature_size: usize) -> Vec<usize> {
    if signature_size < 2 {
        return (0..signature_size).collect();
    }

    let mut order = Vec::with_capacity(signature_size);
    order.extend([1, 0]);
    for row in 1..signature_size / 2 {
        order.push(row + 1);
        order.push(signature_size - row);
    }
    order
}

/// Rearrange pages into physical printing order, one signature at a time.
///
/// The page count must already be a multiple of `signature_size`; pad first.
pub fn reorder<C>(doc: PageSequence<C>, signature_size: usize) -> Result<PageSequence<C>> {
    if signature_size == 0 || signature_size % 2 != 0 || signature_size > MAX_SIGNATURE_SIZE {
        return Err(BookletError::InvariantViolation(format!(
            "signature size must be a positive even number up to {}, got {}",
            MAX_SIGNATURE_SIZE, signature_size
        )));
    }
    if doc.len() % signature_size != 0 {
        return Err(BookletError::InvariantViolation(format!(
            "{} pages is not a multiple of the signature size {}",
            doc.len(),
            signature_size
        )));
    }

    let order = signature_order(signature_size);
    let total = doc.len();
    let mut slots: Vec<_> = doc.into_iter().map(Some).collect();
    let mut reordered = Vec::with_capacity(total);

    for start in (0..total).step_by(signature_size) {
        for &offset in &order {
            let page = slots[start + offset].take().ok_or_else(|| {
                BookletError::InvariantViolation(format!(
                    "page {} placed twice in signature starting at {}",
                    start + offset,
                    start
                ))
            })?;
            reordered.push(page);
        }
    }

    log::debug!(
        "Reordered {} pages into {} signatures",
        total,
        total / signature_size
    );

    Ok(PageSequence::new(reordered))
}
