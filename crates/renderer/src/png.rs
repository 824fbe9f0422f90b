//! PNG encoding and text metadata embedding.
//!
//! Pixels are written as 8-bit RGB (color type 2) with one zlib-compressed
//! IDAT chunk. Text metadata goes into `tEXt` chunks (or `iTXt` when the
//! value is not Latin-1) placed just before `IEND`.

use std::io::Write;
use std::path::Path;

use wallpaper_common::{WallpaperError, WallpaperResult};

use crate::compositor::RasterResult;
use crate::metadata::{serialize_metadata, MetadataMap};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Keyword of the chunk holding the serialized metadata.
pub const USER_COMMENT_KEYWORD: &str = "UserComment";

/// Keyword of the chunk naming the producing software.
pub const SOFTWARE_KEYWORD: &str = "Software";

/// Name written in the `Software` chunk, followed by the version.
pub const SOFTWARE_NAME: &str = "IsohypsesWallpaper";

/// A raw PNG chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngChunk {
    pub kind: [u8; 4],
    pub data: Vec<u8>,
}

impl PngChunk {
    fn new(kind: &[u8; 4], data: Vec<u8>) -> Self {
        Self { kind: *kind, data }
    }

    /// Keyword of a `tEXt`, `zTXt` or `iTXt` chunk.
    fn text_keyword(&self) -> Option<&[u8]> {
        match &self.kind {
            b"tEXt" | b"zTXt" | b"iTXt" => self.data.split(|&b| b == 0).next(),
            _ => None,
        }
    }
}

/// Create a PNG image from RGB pixel data (color type 2).
///
/// # Arguments
/// - `pixels`: RGB pixel data (3 bytes per pixel)
/// - `width`: Image width in pixels
/// - `height`: Image height in pixels
pub fn encode_png(pixels: &[u8], width: usize, height: usize) -> WallpaperResult<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(WallpaperError::Encode(format!(
            "cannot encode an empty {}x{} image",
            width, height
        )));
    }
    if pixels.len() != width * height * 3 {
        return Err(WallpaperError::Encode(format!(
            "expected {} RGB bytes for {}x{}, got {}",
            width * height * 3,
            width,
            height,
            pixels.len()
        )));
    }

    let mut png = Vec::new();

    // PNG signature
    png.extend_from_slice(&PNG_SIGNATURE);

    // IHDR chunk
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr_data.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(2); // color type (RGB)
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    // IDAT chunk (image data)
    let idat_data = deflate_idat_rgb(pixels, width, height)
        .map_err(|e| WallpaperError::Encode(format!("IDAT compression failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    // IEND chunk
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Encode `raster` and write it to `path`.
pub fn write_png(path: impl AsRef<Path>, raster: &RasterResult) -> WallpaperResult<()> {
    let png = encode_png(&raster.pixels, raster.width as usize, raster.height as usize)?;
    std::fs::write(path.as_ref(), png)?;
    tracing::debug!(path = %path.as_ref().display(), "Wrote PNG");
    Ok(())
}

/// Attach `metadata` to the PNG at `path` as a `UserComment` chunk plus a
/// `Software` chunk, rewriting the file.
///
/// Chunks already carrying those keywords are replaced, so embedding twice
/// gives the same file. Image chunks are copied unchanged.
pub fn embed_metadata(
    path: impl AsRef<Path>,
    metadata: &MetadataMap,
    version: &str,
) -> WallpaperResult<()> {
    let path = path.as_ref();
    let original = std::fs::read(path)?;

    let entries = [
        (USER_COMMENT_KEYWORD, serialize_metadata(metadata)),
        (SOFTWARE_KEYWORD, format!("{} {}", SOFTWARE_NAME, version)),
    ];
    let updated = embed_text(&original, &entries)?;

    std::fs::write(path, updated)?;
    tracing::debug!(path = %path.display(), keys = metadata.len(), "Embedded metadata");
    Ok(())
}

/// Return `png` with one text chunk per `(keyword, text)` entry, dropping
/// existing text chunks with the same keywords.
pub fn embed_text<K, V>(png: &[u8], entries: &[(K, V)]) -> WallpaperResult<Vec<u8>>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let chunks = read_chunks(png)?;

    let mut text_chunks = Vec::with_capacity(entries.len());
    for (keyword, text) in entries {
        text_chunks.push(text_chunk(keyword.as_ref(), text.as_ref())?);
    }

    let replaced = |chunk: &PngChunk| {
        chunk
            .text_keyword()
            .map(|kw| entries.iter().any(|(k, _)| k.as_ref().as_bytes() == kw))
            .unwrap_or(false)
    };

    let mut out = Vec::with_capacity(png.len() + 256);
    out.extend_from_slice(&PNG_SIGNATURE);
    for chunk in chunks.iter().filter(|&c| !replaced(c)) {
        if &chunk.kind == b"IEND" {
            for text in &text_chunks {
                write_chunk(&mut out, &text.kind, &text.data);
            }
        }
        write_chunk(&mut out, &chunk.kind, &chunk.data);
    }

    Ok(out)
}

/// Read `(keyword, text)` pairs from the uncompressed text chunks of `png`.
pub fn read_text_chunks(png: &[u8]) -> WallpaperResult<Vec<(String, String)>> {
    let mut texts = Vec::new();

    for chunk in read_chunks(png)? {
        match &chunk.kind {
            b"tEXt" => {
                let (keyword, text) = split_null(&chunk.data)?;
                texts.push((latin1_to_string(keyword), latin1_to_string(text)));
            }
            b"iTXt" => {
                if let Some(pair) = parse_itxt(&chunk.data)? {
                    texts.push(pair);
                }
            }
            _ => {}
        }
    }

    Ok(texts)
}

/// Read the text chunks of the PNG file at `path`.
pub fn read_text_chunks_from_file(path: impl AsRef<Path>) -> WallpaperResult<Vec<(String, String)>> {
    let png = std::fs::read(path.as_ref())?;
    read_text_chunks(&png)
}

/// Split `png` into chunks, checking the signature and every CRC.
pub fn read_chunks(png: &[u8]) -> WallpaperResult<Vec<PngChunk>> {
    if png.len() < PNG_SIGNATURE.len() || png[..8] != PNG_SIGNATURE {
        return Err(WallpaperError::Encode("not a PNG file".to_string()));
    }

    let mut chunks = Vec::new();
    let mut pos = PNG_SIGNATURE.len();

    while pos < png.len() {
        if pos + 12 > png.len() {
            return Err(WallpaperError::Encode(format!("truncated chunk at byte {}", pos)));
        }
        let len = u32::from_be_bytes([png[pos], png[pos + 1], png[pos + 2], png[pos + 3]]) as usize;
        let kind = [png[pos + 4], png[pos + 5], png[pos + 6], png[pos + 7]];
        let data_start = pos + 8;
        let data_end = data_start
            .checked_add(len)
            .filter(|&end| end + 4 <= png.len())
            .ok_or_else(|| WallpaperError::Encode(format!("truncated chunk at byte {}", pos)))?;

        let data = &png[data_start..data_end];
        let stored_crc = u32::from_be_bytes([
            png[data_end],
            png[data_end + 1],
            png[data_end + 2],
            png[data_end + 3],
        ]);
        let crc = crc32_checksum(&[kind.as_slice(), data].concat());
        if crc != stored_crc {
            return Err(WallpaperError::Encode(format!(
                "CRC mismatch in {} chunk",
                String::from_utf8_lossy(&kind)
            )));
        }

        chunks.push(PngChunk::new(&kind, data.to_vec()));
        pos = data_end + 4;

        if &kind == b"IEND" {
            break;
        }
    }

    if chunks.last().map(|c| &c.kind != b"IEND").unwrap_or(true) {
        return Err(WallpaperError::Encode("missing IEND chunk".to_string()));
    }

    Ok(chunks)
}

/// Build a `tEXt` chunk, or an uncompressed `iTXt` chunk when `text` has
/// characters outside Latin-1.
fn text_chunk(keyword: &str, text: &str) -> WallpaperResult<PngChunk> {
    let keyword_ok = !keyword.is_empty()
        && keyword.len() <= 79
        && keyword.bytes().all(|b| (32..=126).contains(&b))
        && !keyword.starts_with(' ')
        && !keyword.ends_with(' ');
    if !keyword_ok {
        return Err(WallpaperError::Encode(format!("invalid text keyword '{}'", keyword)));
    }

    if let Some(latin1) = string_to_latin1(text) {
        let mut data = Vec::with_capacity(keyword.len() + 1 + latin1.len());
        data.extend_from_slice(keyword.as_bytes());
        data.push(0);
        data.extend_from_slice(&latin1);
        return Ok(PngChunk::new(b"tEXt", data));
    }

    // keyword, null, compression flag, compression method, empty language
    // tag, null, empty translated keyword, null, UTF-8 text
    let mut data = Vec::with_capacity(keyword.len() + 5 + text.len());
    data.extend_from_slice(keyword.as_bytes());
    data.extend_from_slice(&[0, 0, 0, 0, 0]);
    data.extend_from_slice(text.as_bytes());
    Ok(PngChunk::new(b"iTXt", data))
}

fn parse_itxt(data: &[u8]) -> WallpaperResult<Option<(String, String)>> {
    let (keyword, rest) = split_null(data)?;
    if rest.len() < 2 {
        return Err(WallpaperError::Encode("truncated iTXt chunk".to_string()));
    }
    // Compressed text is not read
    if rest[0] != 0 {
        return Ok(None);
    }
    let (_language, rest) = split_null(&rest[2..])?;
    let (_translated, text) = split_null(rest)?;
    Ok(Some((
        latin1_to_string(keyword),
        String::from_utf8_lossy(text).into_owned(),
    )))
}

fn split_null(data: &[u8]) -> WallpaperResult<(&[u8], &[u8])> {
    let idx = data
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| WallpaperError::Encode("text chunk without separator".to_string()))?;
    Ok((&data[..idx], &data[idx + 1..]))
}

fn string_to_latin1(text: &str) -> Option<Vec<u8>> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect()
}

fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    // Write length
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());

    // Write chunk type
    png.extend_from_slice(chunk_type);

    // Write data
    png.extend_from_slice(data);

    // Write CRC
    let crc_data = [chunk_type.as_slice(), data].concat();
    let crc = crc32_checksum(&crc_data);
    png.extend_from_slice(&crc.to_be_bytes());
}

/// Deflate RGB image data for IDAT chunk.
fn deflate_idat_rgb(pixels: &[u8], width: usize, height: usize) -> std::io::Result<Vec<u8>> {
    let stride = width * 3;

    // Add filter byte (0 = no filter) to each scanline
    let mut uncompressed = Vec::with_capacity(height * (1 + stride));
    for row in pixels.chunks_exact(stride).take(height) {
        uncompressed.push(0); // filter type: none
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&uncompressed)?;
    encoder.finish()
}

/// Simple CRC32 checksum (PNG-style)
fn crc32_checksum(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}
