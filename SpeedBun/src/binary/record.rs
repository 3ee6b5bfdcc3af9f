//! Packed wire records decoded field by field
//!
//! Chunk bodies embed tightly packed vectors and matrices. Each record type
//! declares its exact size and field order here rather than relying on any
//! in-memory layout.

use glam::{Mat4, Vec2, Vec3, Vec4};

use super::BinaryCursor;
use crate::error::Result;

/// A fixed-size little-endian record with no padding between fields.
pub trait BinaryRecord: Sized {
    /// Size of the record on the wire, in bytes.
    const SIZE: usize;

    /// Decode the record from the cursor position.
    fn read(cursor: &mut BinaryCursor<'_>) -> Result<Self>;
}

/// `x, y` as two `f32`.
impl BinaryRecord for Vec2 {
    const SIZE: usize = 8;

    fn read(cursor: &mut BinaryCursor<'_>) -> Result<Self> {
        let x = cursor.read_f32()?;
        let y = cursor.read_f32()?;
        Ok(Vec2::new(x, y))
    }
}

/// `x, y, z` as three `f32`.
impl BinaryRecord for Vec3 {
    const SIZE: usize = 12;

    fn read(cursor: &mut BinaryCursor<'_>) -> Result<Self> {
        let x = cursor.read_f32()?;
        let y = cursor.read_f32()?;
        let z = cursor.read_f32()?;
        Ok(Vec3::new(x, y, z))
    }
}

/// `x, y, z, w` as four `f32`.
impl BinaryRecord for Vec4 {
    const SIZE: usize = 16;

    fn read(cursor: &mut BinaryCursor<'_>) -> Result<Self> {
        let x = cursor.read_f32()?;
        let y = cursor.read_f32()?;
        let z = cursor.read_f32()?;
        let w = cursor.read_f32()?;
        Ok(Vec4::new(x, y, z, w))
    }
}

/// Sixteen `f32` stored row by row (`M11, M12, ... M44`), translation in the
/// last row.
impl BinaryRecord for Mat4 {
    const SIZE: usize = 64;

    fn read(cursor: &mut BinaryCursor<'_>) -> Result<Self> {
        let mut rows = [Vec4::ZERO; 4];
        for row in &mut rows {
            *row = cursor.read_record::<Vec4>()?;
        }
        // Row-major on the wire with row vectors; glam stores column vectors,
        // so each wire row becomes a column.
        Ok(Mat4::from_cols(rows[0], rows[1], rows[2], rows[3]))
    }
}
