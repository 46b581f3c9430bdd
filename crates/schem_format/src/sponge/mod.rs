//! The three sponge schematic revisions.
//!
//! All of them are gzip + big-endian NBT with a VarInt block index stream
//! and a string-keyed palette; they differ in the root wrapper, the biome
//! layer, and which record names they use. See the per-version modules for
//! the exact layouts.

mod v1;
mod v2;
mod v3;

pub use v1::{read_v1, write_v1};
pub use v2::{read_v2, write_v2};
pub use v3::{read_v3, write_v3};

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::palette::Palette;
use crate::schematic::Schematic;
use crate::types::BlockState;

/// Validate the int16 dimensions common to every sponge root.
fn check_dimensions(width: i16, height: i16, length: i16) -> Result<(i32, i32, i32)> {
    let (width, height, length) = (i32::from(width), i32::from(height), i32::from(length));
    if width <= 0 || height <= 0 || length <= 0 {
        return Err(Error::InvalidDimensions(width, height, length));
    }
    Ok((width, height, length))
}

/// Invert an on-disk `canonical string -> index` palette into an indexable
/// table of parsed states. Gaps stay `None` and decode as air.
fn invert_palette(palette: &HashMap<String, i32>) -> Vec<Option<BlockState>> {
    let len = palette
        .values()
        .filter(|&&idx| idx >= 0)
        .map(|&idx| idx as usize + 1)
        .max()
        .unwrap_or(0);
    let mut table = vec![None; len];
    for (state, &idx) in palette {
        if idx >= 0 {
            table[idx as usize] = Some(BlockState::parse(state));
        }
    }
    table
}

/// Place decoded palette indices into the schematic in Y-major order.
/// Invalid indices and palette gaps are skipped.
fn apply_block_indices(
    schem: &mut Schematic,
    palette: &[Option<BlockState>],
    indices: &[u32],
) {
    let (width, height, length) = schem.dimensions();
    for y in 0..height {
        for z in 0..length {
            for x in 0..width {
                let idx = (x + z * width + y * width * length) as usize;
                let Some(&palette_idx) = indices.get(idx) else {
                    continue;
                };
                let Some(Some(state)) = palette.get(palette_idx as usize) else {
                    continue;
                };
                schem.set_block(x, y, z, Some(state.clone()));
            }
        }
    }
}

/// Collect the full block grid of a schematic as palette indices, building
/// the palette as a side effect. Air maps to index 0.
fn collect_block_indices(schem: &Schematic, palette: &mut Palette) -> Vec<u32> {
    let (width, height, length) = schem.dimensions();
    let mut indices = vec![0u32; schem.volume()];
    for y in 0..height {
        for z in 0..length {
            for x in 0..width {
                if let Some(block) = schem.block(x, y, z) {
                    let idx = (x + z * width + y * width * length) as usize;
                    indices[idx] = palette.add(block.clone());
                }
            }
        }
    }
    indices
}

/// Render a palette into the on-disk `canonical string -> index` map.
fn palette_to_map(palette: &Palette) -> HashMap<String, i32> {
    palette
        .iter()
        .enumerate()
        .map(|(idx, state)| (state.canonical(), idx as i32))
        .collect()
}

/// Invert an on-disk biome palette map into an indexable name table.
fn invert_biome_palette(palette: &HashMap<String, i32>) -> Vec<Option<String>> {
    let len = palette
        .values()
        .filter(|&&idx| idx >= 0)
        .map(|&idx| idx as usize + 1)
        .max()
        .unwrap_or(0);
    let mut table = vec![None; len];
    for (name, &idx) in palette {
        if idx >= 0 {
            table[idx as usize] = Some(name.clone());
        }
    }
    table
}
