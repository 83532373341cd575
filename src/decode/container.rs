//! Container detection, zip extraction and zlib stream inflation.

use std::io::Cursor;
use std::path::Path;

use flate2::{Decompress, FlushDecompress, Status};

use crate::foundation::error::{DecodeKind, SvgaError, SvgaResult};

/// Leading bytes of a zip local file header (`"PK"`).
pub const ZIP_MAGIC: [u8; 2] = [0x50, 0x4B];

/// File holding the structured binary movie inside a cache directory.
pub const BINARY_FILE: &str = "movie.binary";

/// File holding the JSON movie specification inside a cache directory.
pub const SPEC_FILE: &str = "movie.spec";

const MIN_INFLATE_CHUNK: usize = 1024;

/// Whether `bytes` starts with the zip signature.
pub fn is_zip(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[..2] == ZIP_MAGIC
}

/// Whether `bytes` starts with a valid zlib (RFC 1950) header using deflate.
pub fn is_zlib_stream(bytes: &[u8]) -> bool {
    if bytes.len() < 2 {
        return false;
    }
    let (cmf, flg) = (bytes[0], bytes[1]);
    cmf & 0x0F == 8 && cmf >> 4 <= 7 && (u16::from(cmf) * 256 + u16::from(flg)) % 31 == 0
}

/// Inflate a zlib stream chunk by chunk into a growable buffer.
///
/// Empty input inflates to empty output. A corrupt stream, or one that has not reached its end
/// marker once the input is exhausted, is a [`DecodeKind::Stream`] failure.
pub fn inflate(input: &[u8]) -> SvgaResult<Vec<u8>> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let chunk = MIN_INFLATE_CHUNK.max(input.len() / 2);
    let mut stream = Decompress::new(true);
    let mut out = Vec::with_capacity(input.len().saturating_mul(2));

    loop {
        out.reserve(chunk);
        let (in_before, out_before) = (stream.total_in(), stream.total_out());
        let consumed = usize::try_from(in_before).unwrap_or(input.len()).min(input.len());
        let status = stream
            .decompress_vec(&input[consumed..], &mut out, FlushDecompress::Sync)
            .map_err(|e| SvgaError::decode(DecodeKind::Stream, e.to_string()))?;

        match status {
            Status::StreamEnd => return Ok(out),
            Status::Ok | Status::BufError => {
                if stream.total_in() == in_before && stream.total_out() == out_before {
                    return Err(SvgaError::decode(
                        DecodeKind::Stream,
                        "stream ended before its end marker",
                    ));
                }
            }
        }
    }
}

/// Extract every member of the zip archive in `bytes` into `dest`.
pub fn extract_zip(bytes: &[u8], dest: &Path) -> SvgaResult<()> {
    std::fs::create_dir_all(dest)
        .map_err(|e| SvgaError::io(format!("create '{}'", dest.display()), e))?;
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| SvgaError::decode(DecodeKind::Zip, e.to_string()))?;
    tracing::debug!(members = archive.len(), dest = %dest.display(), "extracting archive");
    archive
        .extract(dest)
        .map_err(|e| SvgaError::decode(DecodeKind::Zip, e.to_string()))
}

/// Movie document found in a cache directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MovieDocument {
    /// Structured binary bytes, possibly still zlib-compressed.
    Binary(Vec<u8>),
    /// JSON specification bytes.
    Json(Vec<u8>),
}

/// Whether `dir` holds a movie document.
pub fn has_document(dir: &Path) -> bool {
    dir.join(BINARY_FILE).is_file() || dir.join(SPEC_FILE).is_file()
}

/// Read the movie document from `dir`, preferring the structured binary over the JSON form.
pub fn read_document(dir: &Path) -> SvgaResult<MovieDocument> {
    let binary = dir.join(BINARY_FILE);
    if binary.is_file() {
        return std::fs::read(&binary)
            .map(MovieDocument::Binary)
            .map_err(|e| SvgaError::io(format!("read '{}'", binary.display()), e));
    }
    let json_doc = dir.join(SPEC_FILE);
    if json_doc.is_file() {
        return std::fs::read(&json_doc)
            .map(MovieDocument::Json)
            .map_err(|e| SvgaError::io(format!("read '{}'", json_doc.display()), e));
    }
    Err(SvgaError::not_found(format!(
        "no {BINARY_FILE} or {SPEC_FILE} in '{}'",
        dir.display()
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/decode/container.rs"]
mod tests;
