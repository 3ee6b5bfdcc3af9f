//! Bounds-checked little-endian cursor over a byte slice

use byteorder::{ByteOrder, LittleEndian};

use super::record::BinaryRecord;
use crate::error::{Error, Result};

/// Filler word used to pad chunk bodies up to an alignment boundary.
pub const ALIGNMENT_FILLER: u32 = 0x1111_1111;

/// A read position over a borrowed byte buffer.
///
/// Every read is bounds-checked and fails with [`Error::OutOfRange`] instead of
/// panicking. Cursors created with [`BinaryCursor::slice`] borrow the same bytes
/// but keep their own position.
#[derive(Debug, Clone, Copy)]
pub struct BinaryCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryCursor<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Current read position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the read position. Positions past the end are rejected.
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(self.out_of_range_at(position, 0));
        }
        self.position = position;
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the position and the end of the buffer.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    /// The whole underlying buffer.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    fn out_of_range_at(&self, position: usize, requested: usize) -> Error {
        Error::OutOfRange {
            position,
            requested,
            length: self.data.len(),
        }
    }

    fn ensure(&self, requested: usize) -> Result<()> {
        match self.position.checked_add(requested) {
            Some(end) if end <= self.data.len() => Ok(()),
            _ => Err(self.out_of_range_at(self.position, requested)),
        }
    }

    /// Advance the position by `count` bytes.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.ensure(count)?;
        self.position += count;
        Ok(())
    }

    /// Move the position back by `count` bytes.
    pub fn rewind(&mut self, count: usize) -> Result<()> {
        self.position = self
            .position
            .checked_sub(count)
            .ok_or_else(|| self.out_of_range_at(self.position, count))?;
        Ok(())
    }

    /// Read `length` bytes and advance past them.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        self.ensure(length)?;
        let bytes = &self.data[self.position..self.position + length];
        self.position += length;
        Ok(bytes)
    }

    /// Copy `N` bytes into an array and advance past them.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.read_bytes(N)?);
        Ok(array)
    }

    /// Look at the byte `offset` bytes past the position without advancing.
    pub fn peek_u8(&self, offset: usize) -> Result<u8> {
        let index = self
            .position
            .checked_add(offset)
            .filter(|&index| index < self.data.len())
            .ok_or_else(|| self.out_of_range_at(self.position, offset + 1))?;
        Ok(self.data[index])
    }

    pub fn peek_u32(&self) -> Result<u32> {
        self.ensure(4)?;
        Ok(LittleEndian::read_u32(&self.data[self.position..]))
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.read_bytes(8)?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.read_bytes(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.read_bytes(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.read_bytes(8)?))
    }

    /// Read a fixed-length ASCII string, dropping trailing NUL bytes.
    pub fn read_string(&mut self, length: usize) -> Result<String> {
        let bytes = self.read_bytes(length)?;
        let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    /// Decode a packed wire record field by field.
    pub fn read_record<T: BinaryRecord>(&mut self) -> Result<T> {
        self.ensure(T::SIZE)?;
        T::read(self)
    }

    /// Skip the optional `0, length, <length bytes>` padding block.
    ///
    /// A non-zero leading word is data and is left unread.
    pub fn skip_padding(&mut self) -> Result<()> {
        if self.read_u32()? != 0 {
            return self.rewind(4);
        }

        let length = self.read_u32()? as usize;
        self.skip(length)
    }

    /// Consume `0x11111111` filler words. Returns the number of bytes skipped.
    ///
    /// Stops at the first word that is not filler, or when fewer than four bytes
    /// remain, leaving the position at that word.
    pub fn align_filler(&mut self) -> usize {
        let start = self.position;
        while self.remaining() >= 4
            && LittleEndian::read_u32(&self.data[self.position..]) == ALIGNMENT_FILLER
        {
            self.position += 4;
        }
        self.position - start
    }

    /// Advance to the next multiple of `alignment`.
    ///
    /// Returns the number of bytes skipped, or `None` (position unchanged) when the
    /// aligned position would lie past the end of the buffer.
    pub fn align_to(&mut self, alignment: usize) -> Option<usize> {
        if alignment == 0 || self.position % alignment == 0 {
            return Some(0);
        }

        let to_add = alignment - self.position % alignment;
        if self.position + to_add > self.data.len() {
            return None;
        }

        self.position += to_add;
        Some(to_add)
    }

    /// A new cursor over `length` bytes starting `start` bytes past the position.
    ///
    /// `None` takes everything up to the end of the buffer.
    pub fn slice(&self, start: usize, length: Option<usize>) -> Result<BinaryCursor<'a>> {
        let begin = self
            .position
            .checked_add(start)
            .filter(|&begin| begin <= self.data.len())
            .ok_or_else(|| self.out_of_range_at(self.position, start))?;

        let end = match length {
            Some(length) => begin
                .checked_add(length)
                .filter(|&end| end <= self.data.len())
                .ok_or_else(|| self.out_of_range_at(begin, length))?,
            None => self.data.len(),
        };

        Ok(BinaryCursor::new(&self.data[begin..end]))
    }
}
