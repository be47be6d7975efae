//! Text serializers used to render payload bytes for diff display.
//!
//! Serializers never influence pass/fail determination; comparison is always
//! exact byte identity. They exist only so a mismatch can be shown as a
//! readable diff instead of two opaque byte blobs.

use std::sync::Arc;

use thiserror::Error;

/// Failure to render payload bytes as text for diff display.
///
/// A serialization failure never masks the mismatch that triggered it;
/// the runner reports both.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SerializeError(pub String);

/// Converts opaque payload bytes into a string for diff rendering.
pub type SerializeFn = Arc<dyn Fn(&[u8]) -> Result<String, SerializeError> + Send + Sync>;

/// Strict UTF-8 decode. This is the default serializer.
pub fn utf8(data: &[u8]) -> Result<String, SerializeError> {
    String::from_utf8(data.to_vec())
        .map_err(|e| SerializeError(format!("output is not valid UTF-8: {}", e)))
}

/// Hex-dump rendering for binary payloads: offset, hex columns, and an
/// ASCII gutter, 16 bytes per line.
pub fn hex_dump(data: &[u8]) -> Result<String, SerializeError> {
    let mut out = String::new();
    for (i, chunk) in data.chunks(16).enumerate() {
        out.push_str(&format!("{:08x}  ", i * 16));
        for col in 0..16 {
            match chunk.get(col) {
                Some(b) => out.push_str(&format!("{:02x} ", b)),
                None => out.push_str("   "),
            }
            if col == 7 {
                out.push(' ');
            }
        }
        out.push(' ');
        for b in chunk {
            out.push(if b.is_ascii_graphic() || *b == b' ' {
                *b as char
            } else {
                '.'
            });
        }
        out.push('\n');
    }
    Ok(out)
}
