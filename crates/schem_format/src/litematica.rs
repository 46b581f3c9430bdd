//! Litematica schematics, versions 6 and 7.
//!
//! Gzip + NBT with a `Regions` compound of named regions. Region sizes may
//! be negative on any axis; the region origin is `Position` where the size
//! component is non-negative and `Position + Size + 1` where it is negative.
//! Block indices are tightly packed (values straddle word boundaries) at
//! `max(2, ceil(log2(palette size)))` bits.
//!
//! Only the first region by file order is decoded; the produced schematic is
//! cropped to the bounding box of its non-air content. Writing always emits
//! a version 6 file with a single `"Region"` entry.

use std::collections::HashMap;
use std::io::Write;

use fastnbt::{LongArray, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::compression::{read_gzip_nbt, write_gzip_nbt};
use crate::error::{Error, Result};
use crate::nbt::{self, StatePaletteEntry};
use crate::packing::{bits_per_entry, pack_tight, unpack_tight};
use crate::palette::Palette;
use crate::schematic::Schematic;
use crate::types::BlockState;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LitematicaNbt {
    version: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub_version: Option<i32>,
    #[serde(default)]
    minecraft_data_version: i32,
    #[serde(default)]
    metadata: MetadataNbt,
    regions: IndexMap<String, RegionNbt>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MetadataNbt {
    #[serde(default)]
    name: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    time_created: i64,
    #[serde(default)]
    time_modified: i64,
    #[serde(default)]
    region_count: i32,
    #[serde(default)]
    total_blocks: i32,
    #[serde(default)]
    total_volume: i32,
    #[serde(default)]
    enclosing_size: Vec3Nbt,
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
struct Vec3Nbt {
    x: i32,
    y: i32,
    z: i32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RegionNbt {
    position: Vec3Nbt,
    size: Vec3Nbt,
    #[serde(default)]
    block_state_palette: Vec<StatePaletteEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    block_states: Option<LongArray>,
    #[serde(default)]
    tile_entities: Vec<HashMap<String, Value>>,
    #[serde(default)]
    entities: Vec<HashMap<String, Value>>,
    // Tick lists are tolerated on read but not modelled.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pending_block_ticks: Vec<HashMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pending_fluid_ticks: Vec<HashMap<String, Value>>,
}

/// Region origin on one axis: the minimum world coordinate covered by the
/// region, accounting for a negative size.
fn origin(position: i32, size: i32) -> i32 {
    if size >= 0 {
        position
    } else {
        position + size + 1
    }
}

/// Read a litematica file of either supported version (the `litematica`
/// alias format).
pub fn read(data: &[u8]) -> Result<Schematic> {
    read_with(data, None, "litematica")
}

/// Read a litematica file, requiring version 6.
pub fn read_v6(data: &[u8]) -> Result<Schematic> {
    read_with(data, Some(6), "litematica_v6")
}

/// Read a litematica file, requiring version 7.
pub fn read_v7(data: &[u8]) -> Result<Schematic> {
    read_with(data, Some(7), "litematica_v7")
}

#[instrument(skip(data), err)]
fn read_with(data: &[u8], expected: Option<i32>, format_id: &'static str) -> Result<Schematic> {
    let root: LitematicaNbt = read_gzip_nbt(data)?;
    match expected {
        Some(expected) if root.version != expected => {
            return Err(Error::WrongFormatVersion {
                expected,
                found: root.version,
            });
        }
        None if root.version != 6 && root.version != 7 => {
            return Err(Error::UnsupportedLitematicaVersion(root.version));
        }
        _ => {}
    }

    let (region_name, region) = root.regions.first().ok_or(Error::NoRegion)?;

    let palette: Vec<BlockState> = region
        .block_state_palette
        .iter()
        .map(StatePaletteEntry::to_state)
        .collect();

    let reg_width = region.size.x.abs();
    let reg_height = region.size.y.abs();
    let reg_length = region.size.z.abs();
    let origin_x = origin(region.position.x, region.size.x);
    let origin_y = origin(region.position.y, region.size.y);
    let origin_z = origin(region.position.z, region.size.z);

    let bits = bits_per_entry(palette.len());
    let volume = (reg_width as usize) * (reg_height as usize) * (reg_length as usize);
    let words: &[i64] = region.block_states.as_deref().unwrap_or(&[]);
    let indices = unpack_tight(words, bits, volume);

    // Collect non-air placements and their bounding box; the produced
    // schematic is shrunk to that box.
    let mut placements = Vec::new();
    let (mut min_x, mut min_y, mut min_z) = (i32::MAX, i32::MAX, i32::MAX);
    let (mut max_x, mut max_y, mut max_z) = (i32::MIN, i32::MIN, i32::MIN);
    for y in 0..reg_height {
        for z in 0..reg_length {
            for x in 0..reg_width {
                let idx = (x + z * reg_width + y * reg_width * reg_length) as usize;
                let Some(&palette_idx) = indices.get(idx) else {
                    continue;
                };
                let Some(state) = palette.get(palette_idx as usize) else {
                    continue;
                };
                if state.is_air() {
                    continue;
                }
                placements.push((x, y, z, state.clone()));
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                min_z = min_z.min(z);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
                max_z = max_z.max(z);
            }
        }
    }

    let (width, height, length) = if placements.is_empty() {
        (min_x, min_y, min_z) = (0, 0, 0);
        (reg_width, reg_height, reg_length)
    } else {
        (max_x - min_x + 1, max_y - min_y + 1, max_z - min_z + 1)
    };

    let mut schem = Schematic::new(width, height, length, format_id);
    schem.set_data_version(root.minecraft_data_version);
    schem.set_offset(origin_x + min_x, origin_y + min_y, origin_z + min_z);

    if !root.metadata.name.is_empty() {
        schem.set_metadata("Name", Value::String(root.metadata.name.clone()));
    }
    if !root.metadata.author.is_empty() {
        schem.set_metadata("Author", Value::String(root.metadata.author.clone()));
    }
    if !root.metadata.description.is_empty() {
        schem.set_metadata("Description", Value::String(root.metadata.description.clone()));
    }
    schem.set_metadata("RegionName", Value::String(region_name.clone()));
    if root.metadata.time_created != 0 {
        schem.set_metadata("TimeCreated", Value::Long(root.metadata.time_created));
    }
    if root.metadata.time_modified != 0 {
        schem.set_metadata("TimeModified", Value::Long(root.metadata.time_modified));
    }

    for (x, y, z, state) in placements {
        schem.set_block(x - min_x, y - min_y, z - min_z, Some(state));
    }

    // Block entity coordinates are region-local; translate into the cropped
    // box and drop anything that falls outside it.
    for compound in &region.tile_entities {
        let be = nbt::block_entity_from_coords(compound);
        schem.set_block_entity(be.x - min_x, be.y - min_y, be.z - min_z, Some(be));
    }

    for compound in &region.entities {
        let mut entity = nbt::entity_from_compound(compound);
        entity.pos[0] -= f64::from(min_x);
        entity.pos[1] -= f64::from(min_y);
        entity.pos[2] -= f64::from(min_z);
        schem.add_entity(entity);
    }

    Ok(schem)
}

/// Write a schematic as a version 6 litematica file with a single region.
#[instrument(skip_all, err)]
pub fn write_v6<W: Write>(writer: &mut W, schem: &Schematic) -> Result<()> {
    let (width, height, length) = schem.dimensions();
    let (offset_x, offset_y, offset_z) = schem.offset();

    let mut palette = Palette::with_air();
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

    let bits = bits_per_entry(palette.len());
    let packed = pack_tight(&indices, bits);

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

    let region = RegionNbt {
        position: Vec3Nbt {
            x: offset_x,
            y: offset_y,
            z: offset_z,
        },
        size: Vec3Nbt {
            x: width,
            y: height,
            z: length,
        },
        block_state_palette: palette.iter().map(StatePaletteEntry::from_state).collect(),
        block_states: Some(LongArray::new(packed)),
        tile_entities,
        entities,
        pending_block_ticks: Vec::new(),
        pending_fluid_ticks: Vec::new(),
    };

    let metadata = MetadataNbt {
        name: schem.metadata_str("Name").unwrap_or_default().to_owned(),
        author: schem.metadata_str("Author").unwrap_or_default().to_owned(),
        description: schem
            .metadata_str("Description")
            .unwrap_or_default()
            .to_owned(),
        time_created: schem.metadata_i64("TimeCreated").unwrap_or(0),
        time_modified: schem.metadata_i64("TimeModified").unwrap_or(0),
        region_count: 1,
        total_blocks: schem.block_count() as i32,
        total_volume: (width * height * length),
        enclosing_size: Vec3Nbt {
            x: width,
            y: height,
            z: length,
        },
    };

    let mut regions = IndexMap::new();
    regions.insert("Region".to_owned(), region);

    let root = LitematicaNbt {
        version: 6,
        sub_version: None,
        minecraft_data_version: schem.data_version(),
        metadata,
        regions,
    };

    let bytes = write_gzip_nbt(&root, "")?;
    writer.write_all(&bytes)?;
    Ok(())
}
