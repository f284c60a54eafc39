//! # RLE Nametables
//!
//! Full-screen nametables are 1 KiB each, mostly repeated tiles, so they are
//! stored compressed in the format of neslib's `vram_unrle`:
//!
//! ```text
//! tag  byte byte ... tag n ... tag 0
//! ```
//!
//! - the first byte is the **tag**, a value that never appears as data
//! - any other byte is written as-is and remembered
//! - `tag n` writes the remembered byte `n` more times
//! - `tag 0` ends the stream
//!
//! Streams are validated once, when the [`Rle`] is made. Compress assets at
//! build time with `nes_asset_macros::include_rle!`, which validates in a
//! `const` so a bad stream fails the build rather than the console.

use core::fmt;

use crate::video::Video;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RleError {
    /// No tag byte.
    Empty,
    /// A tag at `offset` is missing its count.
    Truncated { offset: usize },
    /// A run at `offset` has no byte to repeat.
    RunWithoutLiteral { offset: usize },
    /// The stream never hits `tag 0`.
    Unterminated,
}

impl fmt::Display for RleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RleError::Empty => f.write_str("rle stream is empty"),
            RleError::Truncated { offset } => write!(f, "rle tag at {offset} has no count"),
            RleError::RunWithoutLiteral { offset } => {
                write!(f, "rle run at {offset} comes before any literal")
            }
            RleError::Unterminated => f.write_str("rle stream has no end marker"),
        }
    }
}

/// A validated RLE stream, up to and including its end marker.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rle<'a> {
    bytes: &'a [u8],
}

impl<'a> Rle<'a> {
    pub const fn new(bytes: &'a [u8]) -> Result<Self, RleError> {
        if bytes.is_empty() {
            return Err(RleError::Empty);
        }
        let tag = bytes[0];
        let mut seen_literal = false;
        let mut i = 1;
        while i < bytes.len() {
            if bytes[i] != tag {
                seen_literal = true;
                i += 1;
                continue;
            }
            if i + 1 >= bytes.len() {
                return Err(RleError::Truncated { offset: i });
            }
            if bytes[i + 1] == 0 {
                // anything after the end marker is not ours
                let (stream, _) = bytes.split_at(i + 2);
                return Ok(Self { bytes: stream });
            }
            if !seen_literal {
                return Err(RleError::RunWithoutLiteral { offset: i });
            }
            i += 2;
        }
        Err(RleError::Unterminated)
    }

    #[inline]
    pub const fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    #[inline]
    pub const fn tag(&self) -> u8 {
        self.bytes[0]
    }

    /// Number of bytes the stream expands to.
    pub const fn unpacked_len(&self) -> usize {
        let tag = self.tag();
        let mut len = 0;
        let mut i = 1;
        while i < self.bytes.len() {
            if self.bytes[i] == tag {
                len += self.bytes[i + 1] as usize;
                i += 2;
            } else {
                len += 1;
                i += 1;
            }
        }
        len
    }

    /// Expand the stream into VRAM at the current cursor, like neslib's
    /// `vram_unrle`. Returns the number of bytes written.
    pub fn unpack<V: Video + ?Sized>(&self, video: &mut V) -> usize {
        let tag = self.tag();
        let bytes = self.bytes;
        let mut written = 0;
        let mut last = 0;
        let mut i = 1;
        while i < bytes.len() {
            if bytes[i] == tag {
                let count = bytes[i + 1] as usize;
                if count == 0 {
                    break;
                }
                video.fill_vram(last, count);
                written += count;
                i += 2;
            } else {
                // literals are contiguous in the stream, write them in one go
                let start = i;
                while i < bytes.len() && bytes[i] != tag {
                    i += 1;
                }
                video.write_vram(&bytes[start..i]);
                written += i - start;
                last = bytes[i - 1];
            }
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;
    use crate::ppu::RenderMask;

    /// Collects VRAM writes, ignores everything else.
    struct Sink([u8; 64], usize);

    impl Video for Sink {
        fn wait_vblank(&mut self) {}
        fn set_rendering(&mut self, _: RenderMask) {}
        fn set_palette(&mut self, _: &Palette) {}
        fn set_vram_addr(&mut self, addr: u16) {
            self.1 = addr as usize;
        }
        fn write_vram(&mut self, bytes: &[u8]) {
            self.0[self.1..self.1 + bytes.len()].copy_from_slice(bytes);
            self.1 += bytes.len();
        }
        fn set_scroll(&mut self, _: u8, _: u8) {}
    }

    #[test]
    fn unpacks_literals_and_runs() {
        // tag 0xff: 1, 2, then 2 four more times, 7, end
        let rle = Rle::new(&[0xff, 1, 2, 0xff, 4, 7, 0xff, 0]).unwrap();
        let mut sink = Sink([0; 64], 0);
        assert_eq!(rle.unpacked_len(), 7);
        assert_eq!(rle.unpack(&mut sink), 7);
        assert_eq!(&sink.0[..8], &[1, 2, 2, 2, 2, 2, 7, 0]);
    }

    #[test]
    fn stops_at_end_marker() {
        let rle = Rle::new(&[0x00, 5, 0x00, 0, 9, 9]).unwrap();
        assert_eq!(rle.bytes(), &[0x00, 5, 0x00, 0]);
        assert_eq!(rle.unpacked_len(), 1);
    }

    #[test]
    fn rejects_broken_streams() {
        assert_eq!(Rle::new(&[]), Err(RleError::Empty));
        assert_eq!(Rle::new(&[0xfe, 3, 0xfe]), Err(RleError::Truncated { offset: 2 }));
        assert_eq!(
            Rle::new(&[0xfe, 0xfe, 3, 0xfe, 0]),
            Err(RleError::RunWithoutLiteral { offset: 1 })
        );
        assert_eq!(Rle::new(&[0xfe, 1, 2, 3]), Err(RleError::Unterminated));
    }
}
