//! Writing helpers for building chunk streams

use std::io::{Seek, SeekFrom, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::Result;

/// Chunk-stream writing helpers for any seekable sink.
pub trait ChunkWriteExt: Write + Seek {
    /// Write an 8-byte chunk header.
    fn write_chunk_header(&mut self, id: u32, length: i32) -> Result<()> {
        self.write_u32::<LittleEndian>(id)?;
        self.write_i32::<LittleEndian>(length)?;
        Ok(())
    }

    /// Write `text` as ASCII into a NUL-padded field of `length` bytes
    /// (`text.len() + 1` when `None`). Longer text is cut to fit.
    fn write_fixed_string(&mut self, text: &str, length: Option<usize>) -> Result<usize> {
        let length = length.unwrap_or(text.len() + 1);
        let mut buffer = vec![0u8; length];
        let copied = text.len().min(length);
        buffer[..copied].copy_from_slice(&text.as_bytes()[..copied]);
        self.write_all(&buffer)?;
        Ok(length)
    }

    /// Insert a padding chunk so the position becomes a multiple of `align`.
    ///
    /// The padding chunk header itself counts towards the alignment: when the
    /// header alone reaches the boundary its length stays zero.
    fn write_padding_chunk(&mut self, align: u64) -> Result<()> {
        if align == 0 || self.stream_position()? % align == 0 {
            return Ok(());
        }

        self.write_chunk_header(0, 0)?;

        let position = self.stream_position()?;
        if position % align == 0 {
            return Ok(());
        }

        let need = align - position % align;
        self.seek(SeekFrom::Current(-4))?;
        self.write_u32::<LittleEndian>(need as u32)?;
        self.write_all(&vec![0u8; need as usize])?;
        Ok(())
    }

    /// Pad with `0x11` bytes up to a multiple of `align`. Returns bytes written.
    fn write_filler(&mut self, align: u64) -> Result<u64> {
        let start = self.stream_position()?;
        if align == 0 || start % align == 0 {
            return Ok(0);
        }

        let need = align - start % align;
        self.write_all(&vec![0x11u8; need as usize])?;
        Ok(need)
    }
}

impl<W: Write + Seek + ?Sized> ChunkWriteExt for W {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::BinaryCursor;
    use std::io::Cursor;

    #[test]
    fn test_padding_chunk_reaches_alignment() {
        let mut out = Cursor::new(Vec::new());
        out.write_all(&[0xAA; 4]).unwrap();
        out.write_padding_chunk(0x10).unwrap();

        let bytes = out.into_inner();
        assert_eq!(bytes.len(), 0x10);

        let mut cursor = BinaryCursor::new(&bytes[4..]);
        assert_eq!(cursor.read_u32().unwrap(), 0);
        assert_eq!(cursor.read_u32().unwrap(), 4);
    }

    #[test]
    fn test_padding_header_alone_aligns() {
        let mut out = Cursor::new(Vec::new());
        out.write_all(&[0xAA; 8]).unwrap();
        out.write_padding_chunk(0x10).unwrap();

        let bytes = out.into_inner();
        assert_eq!(bytes.len(), 0x10);
        assert_eq!(&bytes[8..], &[0u8; 8]);
    }

    #[test]
    fn test_fixed_string_and_filler() {
        let mut out = Cursor::new(Vec::new());
        assert_eq!(out.write_fixed_string("B12", Some(8)).unwrap(), 8);
        out.write_all(&[1]).unwrap();
        assert_eq!(out.write_filler(4).unwrap(), 3);

        let bytes = out.into_inner();
        assert_eq!(&bytes[..8], b"B12\0\0\0\0\0");
        assert_eq!(&bytes[9..], &[0x11, 0x11, 0x11]);
    }
}
