//! MCEdit / Schematica "Alpha" legacy schematics.
//!
//! Gzip + NBT with flat `Blocks` and `Data` byte arrays, one numeric block
//! id and metadata nibble per cell, laid out as `(y * Length + z) * Width + x`
//! (a different nesting order than the sponge formats). Namespaced block
//! states come from the bundled legacy id table; ids outside the table read
//! as air and write as `(0, 0)`.
//!
//! These files carry no data version; readers pin 1519 (1.13, the
//! namespaced-id horizon) so version-aware consumers have a coarse anchor.

mod legacy;

pub use legacy::{legacy_block, legacy_ids};

use std::collections::HashMap;
use std::io::Write;

use fastnbt::{ByteArray, Value};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::compression::{read_gzip_nbt, write_gzip_nbt};
use crate::error::{Error, Result};
use crate::nbt;
use crate::schematic::Schematic;
use crate::types::BlockState;

/// Data version recorded for decoded MCEdit files.
const LEGACY_DATA_VERSION: i32 = 1519;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct McEditNbt {
    width: i16,
    height: i16,
    length: i16,
    #[serde(default)]
    materials: String,
    blocks: ByteArray,
    data: ByteArray,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    entities: Vec<HashMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tile_entities: Vec<HashMap<String, Value>>,
    // Tolerated on read, never re-emitted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tile_ticks: Vec<HashMap<String, Value>>,
    #[serde(rename = "WEOffsetX", default)]
    we_offset_x: i32,
    #[serde(rename = "WEOffsetY", default)]
    we_offset_y: i32,
    #[serde(rename = "WEOffsetZ", default)]
    we_offset_z: i32,
}

/// Read an MCEdit schematic.
#[instrument(skip(data), err)]
pub fn read(data: &[u8]) -> Result<Schematic> {
    let root: McEditNbt = read_gzip_nbt(data)?;

    let width = i32::from(root.width);
    let height = i32::from(root.height);
    let length = i32::from(root.length);
    if width <= 0 || height <= 0 || length <= 0 {
        return Err(Error::InvalidDimensions(width, height, length));
    }

    let expected = width as usize * height as usize * length as usize;
    if root.blocks.len() != expected || root.data.len() != expected {
        return Err(Error::BlockDataSizeMismatch {
            expected,
            blocks: root.blocks.len(),
            data: root.data.len(),
        });
    }

    let mut schem = Schematic::new(width, height, length, "mcedit");
    schem.set_data_version(LEGACY_DATA_VERSION);
    schem.set_offset(root.we_offset_x, root.we_offset_y, root.we_offset_z);
    schem.set_metadata("Materials", Value::String(root.materials.clone()));

    // Id/meta pairs repeat heavily; parse each distinct pair once.
    let mut parsed: HashMap<(u8, u8), Option<BlockState>> = HashMap::new();
    for y in 0..height {
        for z in 0..length {
            for x in 0..width {
                let idx = ((y * length + z) * width + x) as usize;
                let id = root.blocks[idx] as u8;
                let meta = root.data[idx] as u8;
                let state = parsed
                    .entry((id, meta))
                    .or_insert_with(|| legacy_block(id, meta).map(BlockState::parse));
                if let Some(state) = state {
                    schem.set_block(x, y, z, Some(state.clone()));
                }
            }
        }
    }

    for compound in &root.tile_entities {
        let be = nbt::block_entity_from_coords(compound);
        schem.set_block_entity(be.x, be.y, be.z, Some(be));
    }
    for compound in &root.entities {
        schem.add_entity(nbt::entity_from_compound(compound));
    }

    Ok(schem)
}

/// Write a schematic as an MCEdit file.
///
/// Blocks whose canonical state has no legacy id degrade to air; the writer
/// never fails on table misses.
#[instrument(skip_all, err)]
pub fn write<W: Write>(writer: &mut W, schem: &Schematic) -> Result<()> {
    let (width, height, length) = schem.dimensions();
    let count = schem.volume();
    let mut blocks = vec![0i8; count];
    let mut data = vec![0i8; count];

    for y in 0..height {
        for z in 0..length {
            for x in 0..width {
                let Some(state) = schem.block(x, y, z) else {
                    continue;
                };
                if let Some((id, meta)) = legacy_ids(&state.canonical()) {
                    let idx = ((y * length + z) * width + x) as usize;
                    blocks[idx] = id as i8;
                    data[idx] = meta as i8;
                }
            }
        }
    }

    let mut tile_entities = Vec::new();
    for y in 0..height {
        for z in 0..length {
            for x in 0..width {
                if let Some(be) = schem.block_entity(x, y, z) {
                    tile_entities.push(nbt::block_entity_to_coords(be, x, y, z));
                }
            }
        }
    }

    let entities = schem
        .entities()
        .iter()
        .map(|entity| nbt::entity_to_compound(entity, "id", entity.pos))
        .collect();

    let (offset_x, offset_y, offset_z) = schem.offset();
    let root = McEditNbt {
        width: width as i16,
        height: height as i16,
        length: length as i16,
        materials: "Alpha".to_owned(),
        blocks: ByteArray::new(blocks),
        data: ByteArray::new(data),
        entities,
        tile_entities,
        tile_ticks: Vec::new(),
        we_offset_x: offset_x,
        we_offset_y: offset_y,
        we_offset_z: offset_z,
    };

    let bytes = write_gzip_nbt(&root, "Schematic")?;
    writer.write_all(&bytes)?;
    Ok(())
}
