#![allow(dead_code)]

//---------------------------------------------------------------------------
// Sprite/texture container decoding.
//
// Layout: [format tag: 1 byte][width: big-endian u32][height: big-endian
// u32][packed pixels]. Format tag 0=Rgb24, 1=Rgba32, 2=Mono1. Grounded in
// original_source's Sprite constructor, which reads width/height as four
// big-endian bytes each starting right after the tag byte, pixel data
// starting at byte 9 (see DESIGN.md: the non-template Sprite.cpp has a
// divergent, almost certainly buggy, bit-shift for this same read - the
// template version in Sprite.hpp is what this follows).
//---------------------------------------------------------------------------

use debug_print::debug_print;

use crate::color::PixelFormat;
use crate::error::RasterError;
use crate::framebuffer::FrameBuffer;

const HEADER_LEN: usize = 9;

fn format_from_tag(tag: u8) -> Result<PixelFormat, RasterError> {
    match tag {
        0 => Ok(PixelFormat::Rgb24),
        1 => Ok(PixelFormat::Rgba32),
        2 => Ok(PixelFormat::Mono1),
        other => Err(RasterError::UnknownFormatTag(other)),
    }
}

fn read_be_u32(data: &[u8], offset: usize) -> u32 {
    ((data[offset] as u32) << 24)
        | ((data[offset + 1] as u32) << 16)
        | ((data[offset + 2] as u32) << 8)
        | (data[offset + 3] as u32)
}

pub fn decode_frame_buffer(data: &[u8]) -> Result<FrameBuffer, RasterError> {
    if data.len() < HEADER_LEN {
        return Err(RasterError::TruncatedContainer {
            expected: HEADER_LEN,
            actual: data.len(),
        });
    }

    let format = format_from_tag(data[0])?;
    let width = read_be_u32(data, 1) as usize;
    let height = read_be_u32(data, 5) as usize;

    let profile = crate::color::ColorProfile::new(format);
    let expected_len = HEADER_LEN + profile.packed_len(width, height);
    if data.len() < expected_len {
        debug_print!(
            "container decode failed: {}x{} {:?} needs {} bytes, got {}",
            width,
            height,
            format,
            expected_len,
            data.len()
        );
        return Err(RasterError::TruncatedContainer {
            expected: expected_len,
            actual: data.len(),
        });
    }

    let pixels = data[HEADER_LEN..expected_len].to_vec();
    Ok(FrameBuffer::from_bytes(width, height, format, pixels))
}

pub fn encode_frame_buffer(buffer: &FrameBuffer) -> Vec<u8> {
    let tag: u8 = match buffer.format() {
        PixelFormat::Rgb24 => 0,
        PixelFormat::Rgba32 => 1,
        PixelFormat::Mono1 => 2,
    };

    let width = buffer.width() as u32;
    let height = buffer.height() as u32;

    let mut out = Vec::with_capacity(HEADER_LEN + buffer.pixels().len());
    out.push(tag);
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&height.to_be_bytes());
    out.extend_from_slice(buffer.pixels());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_rgb24_container() {
        let mut fb = FrameBuffer::new(2, 2, PixelFormat::Rgb24);
        fb.color_profile_mut().set_color_rgb(1.0, 0.0, 0.0);
        fb.put_pixel(0, 0);

        let encoded = encode_frame_buffer(&fb);
        let decoded = decode_frame_buffer(&encoded).unwrap();

        assert_eq!(decoded.width(), 2);
        assert_eq!(decoded.height(), 2);
        assert_eq!(decoded.pixels(), fb.pixels());
    }

    #[test]
    fn truncated_header_is_rejected() {
        let data = [0u8; 4];
        assert!(matches!(
            decode_frame_buffer(&data),
            Err(RasterError::TruncatedContainer { .. })
        ));
    }

    #[test]
    fn unknown_format_tag_is_rejected() {
        let mut data = vec![9u8, 0, 0, 0, 1, 0, 0, 0, 1];
        data.push(0);
        assert!(matches!(
            decode_frame_buffer(&data),
            Err(RasterError::UnknownFormatTag(9))
        ));
    }
}
