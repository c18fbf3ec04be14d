//! PNG decoding into RGBA rasters and encoding of rasters and indexed images.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use pixel_engine::{IndexedImage, Raster};

use crate::error::AppError;

/// Decode any PNG (gray, gray-alpha, RGB, RGBA or indexed; 1 to 16 bits)
/// into an 8-bit RGBA raster
pub fn decode(bytes: &[u8]) -> Result<Raster, AppError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    if info.bit_depth != png::BitDepth::Eight {
        return Err(AppError::UnsupportedImage(format!(
            "bit depth {:?} after normalization",
            info.bit_depth
        )));
    }

    let rgba: Vec<u8> = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|c| [c[0], c[0], c[0], c[1]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(AppError::UnsupportedImage(
                "indexed color was not expanded".to_string(),
            ))
        }
    };

    tracing::debug!(
        width = info.width,
        height = info.height,
        color_type = ?info.color_type,
        "Decoded PNG"
    );

    Ok(Raster::new(
        info.width as usize,
        info.height as usize,
        rgba,
    )?)
}

/// Read and decode a PNG file
pub fn read_file(path: &Path) -> Result<Raster, AppError> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}

/// Encode a raster as an 8-bit RGBA PNG
pub fn encode_rgba(raster: &Raster) -> Result<Vec<u8>, AppError> {
    let (width, height) = png_dimensions(raster.width(), raster.height())?;
    encode_png(
        width,
        height,
        png::ColorType::Rgba,
        png::BitDepth::Eight,
        None,
        None,
        raster.as_bytes(),
    )
}

/// Encode an indexed image as a palette PNG.
///
/// Uses the smallest bit depth that addresses the palette. Transparent
/// pixels get their own PLTE entries with a matching tRNS chunk; if the
/// index/alpha combinations do not fit in 256 entries the image is written
/// as RGBA instead.
pub fn encode_indexed(image: &IndexedImage) -> Result<Vec<u8>, AppError> {
    let (width, height) = png_dimensions(image.width(), image.height())?;

    let Some((entries, indices)) = palette_entries(image) else {
        tracing::debug!("Too many palette/alpha combinations, writing RGBA");
        return encode_rgba(&image.to_raster());
    };

    let (depth, bits) = match entries.len() {
        0..=2 => (png::BitDepth::One, 1),
        3..=4 => (png::BitDepth::Two, 2),
        5..=16 => (png::BitDepth::Four, 4),
        _ => (png::BitDepth::Eight, 8),
    };

    let plte: Vec<u8> = entries
        .iter()
        .flat_map(|&(rgb, _)| rgb.to_bytes())
        .collect();
    let trns: Option<Vec<u8>> = if entries.iter().any(|&(_, a)| a != 255) {
        Some(entries.iter().map(|&(_, a)| a).collect())
    } else {
        None
    };

    let packed = if bits == 8 {
        indices
    } else {
        pack_nbits(&indices, image.width(), bits)
    };

    encode_png(
        width,
        height,
        png::ColorType::Indexed,
        depth,
        Some(plte.as_slice()),
        trns.as_deref(),
        &packed,
    )
}

/// Write an RGBA PNG file
pub fn write_rgba(path: &Path, raster: &Raster) -> Result<(), AppError> {
    std::fs::write(path, encode_rgba(raster)?)?;
    Ok(())
}

/// Write a palette PNG file
pub fn write_indexed(path: &Path, image: &IndexedImage) -> Result<(), AppError> {
    std::fs::write(path, encode_indexed(image)?)?;
    Ok(())
}

type PaletteEntry = (pixel_engine::Rgb, u8);

/// PLTE entries and per-pixel indices into them.
///
/// Opaque images map one-to-one onto the image palette. Otherwise each
/// distinct (index, alpha) pair becomes an entry in first-seen order.
fn palette_entries(image: &IndexedImage) -> Option<(Vec<PaletteEntry>, Vec<u8>)> {
    let colors = image.palette().colors();

    if !image.has_transparency() {
        let entries = colors.iter().map(|&c| (c, 255)).collect();
        return Some((entries, image.indices().to_vec()));
    }

    let mut lookup: HashMap<(u8, u8), u8> = HashMap::new();
    let mut entries = Vec::new();
    let mut indices = Vec::with_capacity(image.indices().len());

    for (&idx, &alpha) in image.indices().iter().zip(image.alpha()) {
        let slot = match lookup.get(&(idx, alpha)) {
            Some(&slot) => slot,
            None => {
                let slot = u8::try_from(entries.len()).ok()?;
                entries.push((image.palette().get(idx as usize).unwrap_or_default(), alpha));
                lookup.insert((idx, alpha), slot);
                slot
            }
        };
        indices.push(slot);
    }

    Some((entries, indices))
}

fn png_dimensions(width: usize, height: usize) -> Result<(u32, u32), AppError> {
    let convert = |v: usize| {
        u32::try_from(v).map_err(|_| AppError::UnsupportedImage(format!("dimension {v} too large")))
    };
    Ok((convert(width)?, convert(height)?))
}

fn encode_png(
    width: u32,
    height: u32,
    color_type: png::ColorType,
    bit_depth: png::BitDepth,
    plte: Option<&[u8]>,
    trns: Option<&[u8]>,
    data: &[u8],
) -> Result<Vec<u8>, AppError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(color_type);
        encoder.set_depth(bit_depth);
        if let Some(plte) = plte {
            encoder.set_palette(plte);
        }
        if let Some(trns) = trns {
            encoder.set_trns(trns);
        }
        let mut writer = encoder.write_header()?;
        writer.write_image_data(data)?;
    }
    Ok(buf.into_inner())
}

/// Pack pixel values into N-bit PNG row data (1, 2, or 4 bits per pixel).
fn pack_nbits(indices: &[u8], width: usize, bits: u8) -> Vec<u8> {
    if width == 0 {
        return Vec::new();
    }
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = width.div_ceil(pixels_per_byte);
    let height = indices.len() / width;
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * height);

    for row in indices.chunks(width) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let shift = (8 - bits) - (i % pixels_per_byte) as u8 * bits;
            byte |= (idx & mask) << shift;
            if i % pixels_per_byte == pixels_per_byte - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
        if row.len() % pixels_per_byte != 0 {
            packed.push(byte);
        }
    }
    packed
}
