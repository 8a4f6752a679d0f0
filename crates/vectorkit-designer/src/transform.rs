//! Conversion of paths between canvas space and object-local space.

use vectorkit_core::{GeometryError, ObjectId};

use crate::model::{Transform, VectorPath};

/// Inverse of an object's transform, or an error when the matrix is degenerate.
pub fn invert(id: ObjectId, t: &Transform) -> Result<Transform, GeometryError> {
    let determinant = t.determinant();
    if !determinant.is_finite() || determinant.abs() <= f64::EPSILON {
        return Err(GeometryError::NonInvertibleTransform { id, determinant });
    }
    t.inverse()
        .ok_or(GeometryError::NonInvertibleTransform { id, determinant })
}

/// Maps a canvas-space path into the local space of object `id`.
///
/// The input is left untouched. Local space has the object's origin at
/// `(0, 0)`, so the result is ready to be stored on the object as a mask.
pub fn to_object_space(
    path: &VectorPath,
    id: ObjectId,
    object_transform: &Transform,
) -> Result<VectorPath, GeometryError> {
    let inverse = invert(id, object_transform)?;
    Ok(path.transformed(&inverse))
}

/// Maps a local-space path of an object back onto the canvas.
pub fn to_canvas_space(path: &VectorPath, object_transform: &Transform) -> VectorPath {
    path.transformed(object_transform)
}
