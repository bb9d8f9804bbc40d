//! Texture dumps for asset investigation

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};

use crate::batch::TextureCategory;
use crate::palette::Palette;

/// Write a palettized texture to `dir` as a PNG named after its hash.
///
/// Existing dumps are left alone, so each distinct texture is written once.
pub fn dump_texture(
    dir: &Path,
    hash: u64,
    category: TextureCategory,
    width: u32,
    height: u32,
    pixels: &[u8],
    palette: &Palette,
) -> Result<PathBuf> {
    let len = (width * height) as usize;
    ensure!(
        pixels.len() >= len,
        "texture {hash:016x} has {} bytes, expected {len}",
        pixels.len()
    );

    let dir = dir.join(format!("{category:?}"));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create dump directory {}", dir.display()))?;

    let path = dir.join(format!("{hash:016x}.png"));
    if path.exists() {
        return Ok(path);
    }

    let rgba: Vec<u8> = pixels[..len]
        .iter()
        .flat_map(|&i| {
            let argb = palette[i as usize];
            [(argb >> 16) as u8, (argb >> 8) as u8, argb as u8, 0xff]
        })
        .collect();

    image::save_buffer(&path, &rgba, width, height, image::ColorType::Rgba8)
        .with_context(|| format!("Failed to write texture dump {}", path.display()))?;

    tracing::debug!("Texture dumped: {}", path.display());
    Ok(path)
}
