//! Fitting source pages into cells
//!
//! Handles aspect-preserving scaling of a (possibly rotated) source page and
//! the PDF transformation matrix that draws it at its final position.

use crate::types::{MediaBox, Rotation};

use super::Rect;

/// Scale that fits a page of the given size, after rotation, inside an area
/// without distortion.
pub fn fit_scale(
    source_width: f32,
    source_height: f32,
    rotation: Rotation,
    area_width: f32,
    area_height: f32,
) -> f32 {
    let (width, height) = rotated_size(source_width, source_height, rotation);
    if width <= 0.0 || height <= 0.0 {
        return 1.0;
    }
    (area_width / width).min(area_height / height)
}

/// Size of a page once rotated
pub fn rotated_size(width: f32, height: f32, rotation: Rotation) -> (f32, f32) {
    if rotation.is_quarter_turn() {
        (height, width)
    } else {
        (width, height)
    }
}

/// Fit a page into `cell`, centred.
///
/// Returns the rectangle covered by the scaled page (same coordinate
/// system as `cell`) and the scale factor.
pub fn fit_page(cell: &Rect, media_box: MediaBox, rotation: Rotation) -> (Rect, f32) {
    let scale = fit_scale(
        media_box.width(),
        media_box.height(),
        rotation,
        cell.width,
        cell.height,
    );
    let (width, height) = rotated_size(media_box.width(), media_box.height(), rotation);
    let (width, height) = (width * scale, height * scale);

    let content = Rect::new(
        cell.center_x() - width / 2.0,
        cell.center_y() - height / 2.0,
        width,
        height,
    );
    (content, scale)
}

/// Affine transformation matrix `[a b c d e f]` as used by the PDF `cm`
/// operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Map a point through the transformation
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Operand list for the `cm` operator
    pub fn to_operands(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}

/// Matrix that draws a page with the given MediaBox rotated clockwise by
/// `rotation`, scaled by `scale`, with the lower-left corner of the result
/// at `(x, y)` in PDF user space.
pub fn placement_transform(
    media_box: MediaBox,
    rotation: Rotation,
    scale: f32,
    x: f32,
    y: f32,
) -> Transform {
    let (w, h) = (media_box.width(), media_box.height());

    // Rotation about the origin, then shifted back into the positive quadrant
    let (a, b, c, d, e, f) = match rotation {
        Rotation::None => (1.0, 0.0, 0.0, 1.0, 0.0, 0.0),
        Rotation::Clockwise90 => (0.0, -1.0, 1.0, 0.0, 0.0, w),
        Rotation::Clockwise180 => (-1.0, 0.0, 0.0, -1.0, w, h),
        Rotation::Clockwise270 => (0.0, 1.0, -1.0, 0.0, h, 0.0),
    };

    // Move the MediaBox origin to (0, 0) first
    let (x0, y0) = (media_box.x0(), media_box.y0());
    let e = e - a * x0 - c * y0;
    let f = f - b * x0 - d * y0;

    Transform {
        a: a * scale,
        b: b * scale,
        c: c * scale,
        d: d * scale,
        e: e * scale + x,
        f: f * scale + y,
    }
}
