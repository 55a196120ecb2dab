//! Binary PGM (P5) codec, maxval 255.

use super::IoError;

pub const MAX_VAL: u32 = 255;

/// Encode a row-major raster as a P5 image.
pub fn encode(width: usize, height: usize, raster: &[u8]) -> Vec<u8> {
    debug_assert_eq!(raster.len(), width * height);
    let header = format!("P5\n{width} {height}\n{MAX_VAL}\n");
    let mut out = Vec::with_capacity(header.len() + raster.len());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(raster);
    out
}

/// Decode a P5 image, checking it is `width x height`. `label` is only used
/// in error messages.
pub fn decode(label: &str, bytes: &[u8], width: usize, height: usize) -> Result<Vec<u8>, IoError> {
    let mut header = Header { bytes, pos: 0 };

    if header.token() != Some(b"P5".as_slice()) {
        return Err(IoError::NotPgm {
            label: label.to_owned(),
        });
    }
    let found_w = header.number(label, "width")?;
    let found_h = header.number(label, "height")?;
    let max_val = header.number(label, "maxval")?;

    if (found_w, found_h) != (width, height) {
        return Err(IoError::Dimensions {
            label: label.to_owned(),
            expected: (width, height),
            found: (found_w, found_h),
        });
    }
    if max_val != MAX_VAL as usize {
        return Err(IoError::MaxVal {
            label: label.to_owned(),
            found: u32::try_from(max_val).unwrap_or(u32::MAX),
        });
    }

    // Exactly one whitespace byte separates the header from the raster.
    let start = header.pos + 1;
    let expected = width * height;
    let data = bytes.get(start..).unwrap_or_default();
    if data.len() < expected {
        return Err(IoError::Truncated {
            label: label.to_owned(),
            expected,
            found: data.len(),
        });
    }
    Ok(data[..expected].to_vec())
}

struct Header<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Header<'a> {
    fn skip_blank(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b == b'#' {
                while self.bytes.get(self.pos).is_some_and(|&c| c != b'\n') {
                    self.pos += 1;
                }
            } else if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn token(&mut self) -> Option<&'a [u8]> {
        self.skip_blank();
        let bytes = self.bytes;
        let start = self.pos;
        while bytes.get(self.pos).is_some_and(|b| !b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        let end = self.pos;
        (end > start).then(|| &bytes[start..end])
    }

    fn number(&mut self, label: &str, field: &str) -> Result<usize, IoError> {
        let bad = |reason: String| IoError::Header {
            label: label.to_owned(),
            reason,
        };
        let token = self.token().ok_or_else(|| bad(format!("missing {field}")))?;
        std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| bad(format!("{field} is not a number")))
    }
}
