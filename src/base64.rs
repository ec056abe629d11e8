//! Base64 codec (standard alphabet, `=` padding).
//!
//! Shipped with the SDK because the Calypso transport encodes binary socket
//! payloads as Base64 inside AT arguments.

use crate::error::Error;

static ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Encoded size for `len` input bytes, padding included.
pub const fn encoded_len(len: usize) -> usize {
    len.div_ceil(3) * 4
}

/// Decoded size for `src`; padding is inspected, so the input must be the
/// full encoded text.
pub fn decoded_len(src: &[u8]) -> usize {
    if src.is_empty() || src.len() % 4 != 0 {
        return 0;
    }
    // More than two padding chars is rejected later in `decode`.
    let padding = src.iter().rev().take_while(|b| **b == b'=').count().min(2);
    src.len() / 4 * 3 - padding
}

/// Encodes `src` into `dst`, returning the number of bytes written.
pub fn encode(src: &[u8], dst: &mut [u8]) -> Result<usize, Error> {
    let needed = encoded_len(src.len());
    if dst.len() < needed {
        return Err(Error::Overflow);
    }
    let mut out = 0;
    for chunk in src.chunks(3) {
        let b0 = chunk[0] as u32;
        let b1 = chunk.get(1).copied().unwrap_or(0) as u32;
        let b2 = chunk.get(2).copied().unwrap_or(0) as u32;
        let triple = b0 << 16 | b1 << 8 | b2;

        dst[out] = ALPHABET[(triple >> 18) as usize & 0x3F];
        dst[out + 1] = ALPHABET[(triple >> 12) as usize & 0x3F];
        dst[out + 2] = if chunk.len() > 1 {
            ALPHABET[(triple >> 6) as usize & 0x3F]
        } else {
            b'='
        };
        dst[out + 3] = if chunk.len() > 2 {
            ALPHABET[triple as usize & 0x3F]
        } else {
            b'='
        };
        out += 4;
    }
    Ok(out)
}

/// Decodes `src` into `dst`, returning the number of bytes written. Fails
/// on characters outside the alphabet, misplaced padding or a length that
/// is not a multiple of four.
pub fn decode(src: &[u8], dst: &mut [u8]) -> Result<usize, Error> {
    if src.len() % 4 != 0 {
        return Err(Error::InvalidArgument);
    }
    if dst.len() < decoded_len(src) {
        return Err(Error::Overflow);
    }
    let mut out = 0;
    for (i, chunk) in src.chunks_exact(4).enumerate() {
        let last = i == src.len() / 4 - 1;
        let mut triple: u32 = 0;
        let mut chars = 0;
        for (j, b) in chunk.iter().enumerate() {
            if *b == b'=' {
                // Padding is only valid in the last one or two positions of
                // the final group.
                if !last || j < 2 || chunk[j..].iter().any(|b| *b != b'=') {
                    return Err(Error::InvalidArgument);
                }
                break;
            }
            triple = triple << 6 | sextet(*b).ok_or(Error::InvalidArgument)? as u32;
            chars += 1;
        }
        triple <<= 6 * (4 - chars);
        let bytes = chars - 1;
        for j in 0..bytes {
            dst[out + j] = (triple >> (16 - 8 * j)) as u8;
        }
        out += bytes;
    }
    Ok(out)
}

fn sextet(b: u8) -> Option<u8> {
    match b {
        b'A'..=b'Z' => Some(b - b'A'),
        b'a'..=b'z' => Some(b - b'a' + 26),
        b'0'..=b'9' => Some(b - b'0' + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}
