//! Fixed-width frame codec.
//!
//! # Responsibilities
//! - Encode the response headers (decimal length + padded content type)
//! - Parse headers back into native values on the client side
//! - Enforce the representable body-length range

use thiserror::Error;

/// Bytes in the zero-padded decimal body-length header.
pub const LENGTH_HEADER_LEN: usize = 10;

/// Bytes in the space-padded content-type header.
pub const CONTENT_TYPE_HEADER_LEN: usize = 100;

/// Total fixed header size preceding the body.
pub const FRAME_HEADER_LEN: usize = LENGTH_HEADER_LEN + CONTENT_TYPE_HEADER_LEN;

/// Smallest body length the 10-digit header cannot represent.
pub const MAX_BODY_LEN: u64 = 10_000_000_000;

/// Content type carried by every error frame.
pub const ERROR_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Errors produced by the frame codec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FrameError {
    /// Body length needs more than 10 decimal digits.
    #[error("body length {0} does not fit the 10-digit length header")]
    BodyTooLarge(u64),

    /// Length header bytes are not a plain ASCII decimal number.
    #[error("invalid length header: {0:?}")]
    InvalidLengthHeader(String),
}

/// Encode the fixed headers for a body of `body_len` bytes.
///
/// The content type is truncated at 100 bytes (never an error) and
/// right-padded with ASCII spaces. Truncation operates on bytes, so a
/// multi-byte character straddling the boundary is cut mid-sequence;
/// [`parse_content_type_header`] decodes lossily for that reason.
pub fn encode_headers(
    body_len: u64,
    content_type: &str,
) -> Result<[u8; FRAME_HEADER_LEN], FrameError> {
    if body_len >= MAX_BODY_LEN {
        return Err(FrameError::BodyTooLarge(body_len));
    }

    let mut header = [b' '; FRAME_HEADER_LEN];
    let digits = format!("{:010}", body_len);
    header[..LENGTH_HEADER_LEN].copy_from_slice(digits.as_bytes());

    let ctype = content_type.as_bytes();
    let ctype_len = ctype.len().min(CONTENT_TYPE_HEADER_LEN);
    header[LENGTH_HEADER_LEN..LENGTH_HEADER_LEN + ctype_len].copy_from_slice(&ctype[..ctype_len]);

    Ok(header)
}

/// Parse the 10-byte length header as a decimal body length.
///
/// Strict: all ten bytes must be ASCII digits. Zero-padding means a
/// valid header never contains signs, spaces, or partial numbers.
pub fn parse_length_header(header: &[u8; LENGTH_HEADER_LEN]) -> Result<u64, FrameError> {
    if !header.iter().all(|b| b.is_ascii_digit()) {
        return Err(FrameError::InvalidLengthHeader(
            String::from_utf8_lossy(header).into_owned(),
        ));
    }
    // Ten ASCII digits always fit a u64.
    std::str::from_utf8(header)
        .ok()
        .and_then(|text| text.parse::<u64>().ok())
        .ok_or_else(|| FrameError::InvalidLengthHeader(String::from_utf8_lossy(header).into_owned()))
}

/// Decode the 100-byte content-type header, stripping the space padding.
pub fn parse_content_type_header(header: &[u8; CONTENT_TYPE_HEADER_LEN]) -> String {
    let end = header
        .iter()
        .rposition(|&b| b != b' ')
        .map_or(0, |last| last + 1);
    String::from_utf8_lossy(&header[..end]).into_owned()
}
