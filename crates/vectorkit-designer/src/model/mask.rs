//! Erase masks attached to scene objects.

use serde::{Deserialize, Serialize};

use super::{Rect, Transform, VectorPath};

/// An erase-mode mask path in its owning object's local coordinate space.
///
/// Only the eraser can build one, after mapping the stroke through the
/// object's inverse matrix, so a `MaskPath` is never in canvas space and
/// always moves with its object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMaskPath")]
pub struct MaskPath {
    path: VectorPath,
    stroke_width: f64,
    relative: bool,
    erase: bool,
}

#[derive(Deserialize)]
struct RawMaskPath {
    path: VectorPath,
    stroke_width: f64,
    relative: bool,
    #[serde(default = "default_erase")]
    erase: bool,
}

fn default_erase() -> bool {
    true
}

impl TryFrom<RawMaskPath> for MaskPath {
    type Error = String;

    fn try_from(raw: RawMaskPath) -> Result<Self, Self::Error> {
        if !raw.relative {
            return Err("mask paths must be relative to their object".to_string());
        }
        if !raw.erase {
            return Err("only erase-mode mask paths are supported".to_string());
        }
        if !(raw.stroke_width.is_finite() && raw.stroke_width > 0.0) {
            return Err(format!("invalid mask stroke width {}", raw.stroke_width));
        }
        Ok(MaskPath {
            path: raw.path,
            stroke_width: raw.stroke_width,
            relative: true,
            erase: true,
        })
    }
}

impl MaskPath {
    pub(crate) fn erase_in_local_space(path: VectorPath, stroke_width: f64) -> Self {
        Self {
            path,
            stroke_width,
            relative: true,
            erase: true,
        }
    }

    /// Path in the owning object's local space.
    pub fn path(&self) -> &VectorPath {
        &self.path
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    pub fn is_relative(&self) -> bool {
        self.relative
    }

    pub fn is_erase(&self) -> bool {
        self.erase
    }

    /// Local-space bounds including the stroke width.
    pub fn bounds(&self) -> Option<Rect> {
        self.path
            .bounds()
            .map(|r| r.inflate(self.stroke_width / 2.0))
    }

    /// The mask's path as it currently appears on the canvas.
    pub fn to_canvas(&self, object_transform: &Transform) -> VectorPath {
        self.path.transformed(object_transform)
    }
}

/// Clip mask on one object: a single mask or a group of composed masks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ClipMask {
    Single(MaskPath),
    Group { masks: Vec<MaskPath> },
}

impl ClipMask {
    /// Composes `mask` with an existing clip mask, if any.
    pub fn merge(existing: Option<ClipMask>, mask: MaskPath) -> ClipMask {
        match existing {
            None => ClipMask::Single(mask),
            Some(ClipMask::Single(first)) => ClipMask::Group {
                masks: vec![first, mask],
            },
            Some(ClipMask::Group { mut masks }) => {
                masks.push(mask);
                ClipMask::Group { masks }
            }
        }
    }

    pub fn masks(&self) -> &[MaskPath] {
        match self {
            ClipMask::Single(mask) => std::slice::from_ref(mask),
            ClipMask::Group { masks } => masks,
        }
    }

    pub fn len(&self) -> usize {
        self.masks().len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks().is_empty()
    }

    pub fn is_group(&self) -> bool {
        matches!(self, ClipMask::Group { .. })
    }
}
