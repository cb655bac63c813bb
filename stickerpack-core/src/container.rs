//! Animated WebP container serialization
//!
//! `image` decodes animated WebP but cannot encode it, so the muxing half of
//! the RIFF/WebP layout lives here. Only what the sticker pipeline produces is
//! written: a `VP8X` header with the animation flag, one `ANIM` chunk and
//! one `ANMF` chunk per frame, each wrapping a lossless `VP8L` bitstream.

use crate::{Error, Result};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use std::io::Write;

const RIFF: [u8; 4] = *b"RIFF";
const WEBP: [u8; 4] = *b"WEBP";
const VP8X: [u8; 4] = *b"VP8X";
const ANIM: [u8; 4] = *b"ANIM";
const ANMF: [u8; 4] = *b"ANMF";
const VP8L: [u8; 4] = *b"VP8L";

/// First byte of every lossless bitstream
const VP8L_SIGNATURE: u8 = 0x2f;

const VP8X_ALPHA: u8 = 0x10;
const VP8X_ANIMATION: u8 = 0x02;

const ANMF_NO_BLEND: u8 = 0x02;
const ANMF_DISPOSE_BACKGROUND: u8 = 0x01;

/// Largest value a 24-bit field can hold
const MAX_U24: u32 = (1 << 24) - 1;

/// Size of the fixed ANMF frame header preceding the frame bitstream
const ANMF_HEADER_LEN: usize = 16;

/// Animation-wide parameters stored in the `VP8X` and `ANIM` chunks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationHeader {
    /// Canvas width in pixels
    pub canvas_width: u32,
    /// Canvas height in pixels
    pub canvas_height: u32,
    /// Background color in B, G, R, A byte order
    pub background: [u8; 4],
    /// Number of loops, 0 = infinite
    pub loop_count: u16,
    /// Whether the alpha flag is set in `VP8X`
    pub has_alpha: bool,
}

impl AnimationHeader {
    /// Creates a header for an infinitely looping animation on a transparent canvas
    pub fn new(canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            canvas_width,
            canvas_height,
            background: [0, 0, 0, 0],
            loop_count: 0,
            has_alpha: true,
        }
    }
}

/// A single `ANMF` frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationFrame {
    /// X offset on the canvas (even)
    pub x_offset: u32,
    /// Y offset on the canvas (even)
    pub y_offset: u32,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Display duration in milliseconds
    pub duration_ms: u32,
    /// Alpha-blend onto the previous canvas instead of replacing it
    pub blend: bool,
    /// Clear the frame rectangle to the background color before the next frame
    pub dispose_to_background: bool,
    /// Lossless `VP8L` bitstream (without chunk header)
    pub bitstream: Vec<u8>,
}

impl AnimationFrame {
    /// Creates a frame covering the canvas from its top-left corner that
    /// replaces the previous frame and is cleared to the background afterwards.
    ///
    /// Width and height are read from the bitstream header.
    pub fn replacing(bitstream: Vec<u8>, duration_ms: u32) -> Result<Self> {
        let (width, height) = vp8l_dimensions(&bitstream)?;
        Ok(Self {
            x_offset: 0,
            y_offset: 0,
            width,
            height,
            duration_ms: duration_ms.min(MAX_U24),
            blend: false,
            dispose_to_background: true,
            bitstream,
        })
    }

    fn flags(&self) -> u8 {
        let mut flags = 0;
        if !self.blend {
            flags |= ANMF_NO_BLEND;
        }
        if self.dispose_to_background {
            flags |= ANMF_DISPOSE_BACKGROUND;
        }
        flags
    }
}

/// Complete animated WebP file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebPAnimation {
    /// Animation header
    pub header: AnimationHeader,
    /// Frames in display order
    pub frames: Vec<AnimationFrame>,
}

impl WebPAnimation {
    /// Creates a new animation
    pub fn new(header: AnimationHeader, frames: Vec<AnimationFrame>) -> Self {
        Self { header, frames }
    }

    /// Writes the animation to a writer
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        if self.frames.is_empty() {
            return Err(Error::EmptyAnimation);
        }
        check_dimensions(self.header.canvas_width, self.header.canvas_height)?;

        let mut body = Vec::new();
        body.write_all(&WEBP)?;

        // VP8X
        let mut flags = VP8X_ANIMATION;
        if self.header.has_alpha {
            flags |= VP8X_ALPHA;
        }
        let mut vp8x = Vec::with_capacity(10);
        vp8x.write_u8(flags)?;
        vp8x.write_all(&[0, 0, 0])?;
        vp8x.write_u24::<LittleEndian>(self.header.canvas_width - 1)?;
        vp8x.write_u24::<LittleEndian>(self.header.canvas_height - 1)?;
        write_chunk(&mut body, &VP8X, &vp8x)?;

        // ANIM
        let mut anim = Vec::with_capacity(6);
        anim.write_all(&self.header.background)?;
        anim.write_u16::<LittleEndian>(self.header.loop_count)?;
        write_chunk(&mut body, &ANIM, &anim)?;

        // ANMF per frame
        for frame in &self.frames {
            check_dimensions(frame.width, frame.height)?;
            let mut anmf = Vec::with_capacity(ANMF_HEADER_LEN + frame.bitstream.len() + 9);
            anmf.write_u24::<LittleEndian>(frame.x_offset / 2)?;
            anmf.write_u24::<LittleEndian>(frame.y_offset / 2)?;
            anmf.write_u24::<LittleEndian>(frame.width - 1)?;
            anmf.write_u24::<LittleEndian>(frame.height - 1)?;
            anmf.write_u24::<LittleEndian>(frame.duration_ms.min(MAX_U24))?;
            anmf.write_u8(frame.flags())?;
            write_chunk(&mut anmf, &VP8L, &frame.bitstream)?;
            write_chunk(&mut body, &ANMF, &anmf)?;
        }

        writer.write_all(&RIFF)?;
        writer.write_u32::<LittleEndian>(body.len() as u32)?;
        writer.write_all(&body)?;
        Ok(())
    }
}

/// Extracts the lossless bitstream from a still WebP file
pub fn extract_vp8l(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < 12 || data[..4] != RIFF || data[8..12] != WEBP {
        return Err(Error::InvalidMagic);
    }
    let riff_size = LittleEndian::read_u32(&data[4..8]) as usize;
    let end = (8 + riff_size).min(data.len());

    read_chunks(&data[12..end])?
        .into_iter()
        .find(|(fourcc, _)| *fourcc == VP8L)
        .map(|(_, payload)| payload.to_vec())
        .ok_or(Error::MissingChunk("VP8L"))
}

/// Reads image dimensions from a `VP8L` bitstream header
pub fn vp8l_dimensions(bitstream: &[u8]) -> Result<(u32, u32)> {
    if bitstream.len() < 5 || bitstream[0] != VP8L_SIGNATURE {
        return Err(Error::InvalidChunk("VP8L"));
    }
    let bits = LittleEndian::read_u32(&bitstream[1..5]);
    let width = (bits & 0x3fff) + 1;
    let height = ((bits >> 14) & 0x3fff) + 1;
    Ok((width, height))
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 || width > MAX_U24 + 1 || height > MAX_U24 + 1 {
        return Err(Error::FrameTooLarge { width, height });
    }
    Ok(())
}

fn write_chunk<W: Write>(writer: &mut W, fourcc: &[u8; 4], payload: &[u8]) -> std::io::Result<()> {
    writer.write_all(fourcc)?;
    writer.write_u32::<LittleEndian>(payload.len() as u32)?;
    writer.write_all(payload)?;
    if payload.len() % 2 == 1 {
        writer.write_u8(0)?;
    }
    Ok(())
}

/// Splits a chunk sequence into `(fourcc, payload)` pairs
fn read_chunks(mut data: &[u8]) -> Result<Vec<([u8; 4], &[u8])>> {
    let mut chunks = Vec::new();
    while data.len() >= 8 {
        let mut fourcc = [0u8; 4];
        fourcc.copy_from_slice(&data[..4]);
        let size = LittleEndian::read_u32(&data[4..8]) as usize;
        let end = 8 + size;
        if end > data.len() {
            return Err(Error::InvalidChunk("RIFF"));
        }
        chunks.push((fourcc, &data[8..end]));
        let padded = (end + size % 2).min(data.len());
        data = &data[padded..];
    }
    Ok(chunks)
}
