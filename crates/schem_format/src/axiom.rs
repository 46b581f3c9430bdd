//! Axiom blueprint files.
//!
//! The only non-gzip-NBT format in the family: a framed binary layout with
//! big-endian 32-bit section lengths.
//!
//! | Field        | Description                                  |
//! |--------------|----------------------------------------------|
//! | Magic        | 4 bytes: 0x0AE5BB36                          |
//! | Header len   | 4 bytes                                      |
//! | Header       | Raw NBT: name, author, tags, thumbnail pose  |
//! | Thumbnail len| 4 bytes                                      |
//! | Thumbnail    | Image bytes, ignored on read, empty on write |
//! | Data len     | 4 bytes                                      |
//! | Data         | Gzip NBT: DataVersion, BlockRegion, entities |
//!
//! Blocks live in 16x16x16 chunks, each with its own palette packed
//! block-aligned at `max(4, ceil(log2(palette size)))` bits. Palette index 0
//! is reserved for `minecraft:structure_void`, which means "no block".

use std::collections::{BTreeMap, HashMap};
use std::io::{Cursor, Write};

use binrw::{binrw, BinRead, BinWrite};
use fastnbt::{LongArray, Value};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::compression::{gunzip, gzip};
use crate::detect::AXIOM_MAGIC;
use crate::error::{Error, Result};
use crate::nbt::{self, StatePaletteEntry};
use crate::packing::{bits_per_entry, pack_aligned, unpack_aligned};
use crate::palette::Palette;
use crate::schematic::Schematic;
use crate::types::{BlockState, AIR_BLOCKS};

const CHUNK_SIZE: i32 = 16;
const CHUNK_AREA: i32 = CHUNK_SIZE * CHUNK_SIZE;
const CHUNK_VOLUME: usize = (CHUNK_SIZE * CHUNK_AREA) as usize;
const EMPTY_BLOCK: &str = "minecraft:structure_void";

/// The outer binary frame. Section payloads stay opaque at this layer.
#[binrw]
#[brw(big, magic = 0x0AE5_BB36_u32)]
struct BlueprintFrame {
    #[br(temp)]
    #[bw(calc = header.len() as u32)]
    header_len: u32,
    #[br(count = header_len)]
    header: Vec<u8>,

    #[br(temp)]
    #[bw(calc = thumbnail.len() as u32)]
    thumbnail_len: u32,
    #[br(count = thumbnail_len)]
    thumbnail: Vec<u8>,

    #[br(temp)]
    #[bw(calc = data.len() as u32)]
    data_len: u32,
    #[br(count = data_len)]
    data: Vec<u8>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HeaderNbt {
    #[serde(default)]
    version: i32,
    #[serde(default)]
    name: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    thumbnail_yaw: f32,
    #[serde(default)]
    thumbnail_pitch: f32,
    #[serde(default)]
    locked_thumbnail: bool,
    #[serde(default)]
    block_count: i32,
    #[serde(default)]
    contains_air: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BlockDataNbt {
    #[serde(default)]
    data_version: i32,
    #[serde(default)]
    block_region: Vec<ChunkNbt>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    block_entities: Vec<HashMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    entities: Vec<HashMap<String, Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChunkNbt {
    #[serde(rename = "X")]
    x: i32,
    #[serde(rename = "Y")]
    y: i32,
    #[serde(rename = "Z")]
    z: i32,
    #[serde(rename = "BlockStates", default, skip_serializing_if = "Option::is_none")]
    block_states: Option<ChunkStatesNbt>,
    /// Older files keep the palette under a chunk-level `data` compound.
    #[serde(rename = "data", default, skip_serializing_if = "Option::is_none")]
    legacy_states: Option<ChunkStatesNbt>,
}

impl ChunkNbt {
    fn states(&self) -> Option<&ChunkStatesNbt> {
        match &self.block_states {
            Some(states) if !states.palette.is_empty() || states.data.is_some() => Some(states),
            _ => self.legacy_states.as_ref(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ChunkStatesNbt {
    #[serde(default)]
    palette: Vec<StatePaletteEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<LongArray>,
}

/// "No block" test: the universal air set plus the structure-void sentinel.
fn is_empty_block(name: &str) -> bool {
    name == EMPTY_BLOCK || AIR_BLOCKS.contains(&name)
}

/// Bits per entry for a chunk palette: the shared minimum raised to 4.
fn chunk_bits(palette_size: usize) -> u32 {
    bits_per_entry(palette_size).max(4)
}

/// Read an Axiom blueprint.
#[instrument(skip(data), err)]
pub fn read(data: &[u8]) -> Result<Schematic> {
    if data.len() < 4 {
        return Err(Error::TruncatedFrame);
    }
    let found = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    if found != AXIOM_MAGIC {
        return Err(Error::InvalidMagic {
            expected: AXIOM_MAGIC,
            found,
        });
    }

    let frame = BlueprintFrame::read(&mut Cursor::new(data)).map_err(frame_read_error)?;
    let header: HeaderNbt = fastnbt::from_bytes(&frame.header).map_err(Error::NbtDecode)?;
    let block_data: BlockDataNbt =
        fastnbt::from_bytes(&gunzip(&frame.data)?).map_err(Error::NbtDecode)?;

    // First pass: every non-empty cell in absolute coordinates, plus the
    // bounding box of all material. Block entities and entity positions
    // deliberately widen the box even outside the block envelope.
    let mut placements = Vec::new();
    let (mut min_x, mut min_y, mut min_z) = (i32::MAX, i32::MAX, i32::MAX);
    let (mut max_x, mut max_y, mut max_z) = (i32::MIN, i32::MIN, i32::MIN);
    let mut has_content = false;
    let mut block_count = 0usize;

    for chunk in &block_data.block_region {
        let Some(states) = chunk.states() else {
            continue;
        };
        let palette: Vec<BlockState> = states.palette.iter().map(StatePaletteEntry::to_state).collect();
        let words: &[i64] = states.data.as_deref().unwrap_or(&[]);
        let indices = unpack_aligned(words, chunk_bits(palette.len()), CHUNK_VOLUME);

        for (cell, &palette_idx) in indices.iter().enumerate() {
            let Some(state) = palette.get(palette_idx as usize) else {
                continue;
            };
            if is_empty_block(&state.name) {
                continue;
            }

            let local_y = cell as i32 / CHUNK_AREA;
            let local_z = cell as i32 % CHUNK_AREA / CHUNK_SIZE;
            let local_x = cell as i32 % CHUNK_SIZE;
            let x = chunk.x * CHUNK_SIZE + local_x;
            let y = chunk.y * CHUNK_SIZE + local_y;
            let z = chunk.z * CHUNK_SIZE + local_z;

            placements.push((x, y, z, state.clone()));
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            min_z = min_z.min(z);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
            max_z = max_z.max(z);
            has_content = true;
            block_count += 1;
        }
    }

    let mut block_entities = Vec::new();
    for compound in &block_data.block_entities {
        let be = nbt::block_entity_from_coords(compound);
        min_x = min_x.min(be.x);
        min_y = min_y.min(be.y);
        min_z = min_z.min(be.z);
        max_x = max_x.max(be.x);
        max_y = max_y.max(be.y);
        max_z = max_z.max(be.z);
        has_content = true;
        block_entities.push(be);
    }

    let mut entities = Vec::new();
    for compound in &block_data.entities {
        let entity = nbt::entity_from_compound(compound);
        if compound.contains_key("Pos") {
            min_x = min_x.min(entity.pos[0].floor() as i32);
            min_y = min_y.min(entity.pos[1].floor() as i32);
            min_z = min_z.min(entity.pos[2].floor() as i32);
            max_x = max_x.max(entity.pos[0].ceil() as i32);
            max_y = max_y.max(entity.pos[1].ceil() as i32);
            max_z = max_z.max(entity.pos[2].ceil() as i32);
            has_content = true;
        }
        entities.push(entity);
    }

    if !has_content {
        let mut schem = Schematic::new(0, 0, 0, "axiom");
        schem.set_data_version(block_data.data_version);
        record_header_metadata(&mut schem, &header, 0, header.contains_air);
        return Ok(schem);
    }

    let width = (max_x - min_x + 1).max(1);
    let height = (max_y - min_y + 1).max(1);
    let length = (max_z - min_z + 1).max(1);

    let mut schem = Schematic::new(width, height, length, "axiom");
    schem.set_offset(min_x, min_y, min_z);
    schem.set_data_version(block_data.data_version);
    let computed_contains_air = block_count < schem.volume();
    record_header_metadata(&mut schem, &header, block_count, computed_contains_air);

    for (x, y, z, state) in placements {
        schem.set_block(x - min_x, y - min_y, z - min_z, Some(state));
    }
    for be in block_entities {
        schem.set_block_entity(be.x - min_x, be.y - min_y, be.z - min_z, Some(be));
    }
    for mut entity in entities {
        entity.pos[0] -= f64::from(min_x);
        entity.pos[1] -= f64::from(min_y);
        entity.pos[2] -= f64::from(min_z);
        schem.add_entity(entity);
    }

    Ok(schem)
}

fn frame_read_error(err: binrw::Error) -> Error {
    match err {
        binrw::Error::Io(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
            Error::TruncatedFrame
        }
        binrw::Error::Io(err) => Error::Io(err),
        _ => Error::TruncatedFrame,
    }
}

fn record_header_metadata(
    schem: &mut Schematic,
    header: &HeaderNbt,
    computed_blocks: usize,
    contains_air: bool,
) {
    if !header.name.is_empty() {
        schem.set_metadata("Name", Value::String(header.name.clone()));
    }
    if !header.author.is_empty() {
        schem.set_metadata("Author", Value::String(header.author.clone()));
    }
    if !header.tags.is_empty() {
        schem.set_metadata(
            "Tags",
            Value::List(header.tags.iter().cloned().map(Value::String).collect()),
        );
    }
    schem.set_metadata("Version", Value::Int(header.version));
    schem.set_metadata("BlockCount", Value::Int(header.block_count));
    schem.set_metadata("ContainsAir", Value::Byte(i8::from(header.contains_air)));
    if header.thumbnail_yaw != 0.0 {
        schem.set_metadata("ThumbnailYaw", Value::Float(header.thumbnail_yaw));
    }
    if header.thumbnail_pitch != 0.0 {
        schem.set_metadata("ThumbnailPitch", Value::Float(header.thumbnail_pitch));
    }
    if header.locked_thumbnail {
        schem.set_metadata("LockedThumbnail", Value::Byte(1));
    }
    schem.set_metadata("ComputedBlockCount", Value::Int(computed_blocks as i32));
    if contains_air {
        schem.set_metadata("ComputedContainsAir", Value::Byte(1));
    }
}

/// Per-chunk palette and cell grid under construction.
struct ChunkBuilder {
    palette: Palette,
    cells: Vec<u32>,
}

impl ChunkBuilder {
    fn new() -> ChunkBuilder {
        let mut palette = Palette::new();
        palette.add(BlockState::new(EMPTY_BLOCK));
        ChunkBuilder {
            palette,
            cells: vec![0; CHUNK_VOLUME],
        }
    }

    fn set(&mut self, local_x: i32, local_y: i32, local_z: i32, state: &BlockState) {
        let idx = (local_y * CHUNK_AREA + local_z * CHUNK_SIZE + local_x) as usize;
        self.cells[idx] = self.palette.add(state.clone());
    }

    fn into_nbt(self, x: i32, y: i32, z: i32) -> ChunkNbt {
        let bits = chunk_bits(self.palette.len());
        ChunkNbt {
            x,
            y,
            z,
            block_states: Some(ChunkStatesNbt {
                palette: self.palette.iter().map(StatePaletteEntry::from_state).collect(),
                data: Some(LongArray::new(pack_aligned(&self.cells, bits))),
            }),
            legacy_states: None,
        }
    }
}

/// Write a schematic as an Axiom blueprint.
#[instrument(skip_all, err)]
pub fn write<W: Write>(writer: &mut W, schem: &Schematic) -> Result<()> {
    let (width, height, length) = schem.dimensions();
    let (offset_x, offset_y, offset_z) = schem.offset();

    // Partition occupied cells into chunks by world coordinates; euclidean
    // division keeps negative coordinates in the right chunk. The BTreeMap
    // key order gives the ascending (Y, Z, X) chunk emission order.
    let mut chunks: BTreeMap<(i32, i32, i32), ChunkBuilder> = BTreeMap::new();
    let mut block_count = 0usize;
    let mut contains_air = false;

    for y in 0..height {
        for z in 0..length {
            for x in 0..width {
                let Some(block) = schem.block(x, y, z) else {
                    contains_air = true;
                    continue;
                };
                if is_empty_block(&block.name) {
                    contains_air = true;
                    continue;
                }

                let world_x = x + offset_x;
                let world_y = y + offset_y;
                let world_z = z + offset_z;
                let key = (
                    world_y.div_euclid(CHUNK_SIZE),
                    world_z.div_euclid(CHUNK_SIZE),
                    world_x.div_euclid(CHUNK_SIZE),
                );
                chunks.entry(key).or_insert_with(ChunkBuilder::new).set(
                    world_x.rem_euclid(CHUNK_SIZE),
                    world_y.rem_euclid(CHUNK_SIZE),
                    world_z.rem_euclid(CHUNK_SIZE),
                    block,
                );
                block_count += 1;
            }
        }
    }

    let mut chunk_list: Vec<ChunkNbt> = chunks
        .into_iter()
        .map(|((chunk_y, chunk_z, chunk_x), builder)| builder.into_nbt(chunk_x, chunk_y, chunk_z))
        .collect();
    if chunk_list.is_empty() {
        // A frame needs at least one chunk to be well formed.
        chunk_list.push(ChunkBuilder::new().into_nbt(0, 0, 0));
    }

    let mut block_entities = Vec::new();
    for y in 0..height {
        for z in 0..length {
            for x in 0..width {
                if let Some(be) = schem.block_entity(x, y, z) {
                    block_entities.push(nbt::block_entity_to_coords(
                        be,
                        x + offset_x,
                        y + offset_y,
                        z + offset_z,
                    ));
                }
            }
        }
    }

    let entities = schem
        .entities()
        .iter()
        .map(|entity| {
            nbt::entity_to_compound(
                entity,
                "id",
                [
                    entity.pos[0] + f64::from(offset_x),
                    entity.pos[1] + f64::from(offset_y),
                    entity.pos[2] + f64::from(offset_z),
                ],
            )
        })
        .collect();

    let tags = match schem.metadata().get("Tags") {
        Some(Value::List(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    let header = HeaderNbt {
        version: 1,
        name: schem
            .metadata_str("Name")
            .filter(|name| !name.is_empty())
            .unwrap_or("Converted Blueprint")
            .to_owned(),
        author: schem.metadata_str("Author").unwrap_or_default().to_owned(),
        tags: if tags.is_empty() {
            vec!["converted".to_owned()]
        } else {
            tags
        },
        block_count: block_count as i32,
        contains_air: contains_air || block_count == 0,
        ..HeaderNbt::default()
    };

    let block_data = BlockDataNbt {
        data_version: schem.data_version(),
        block_region: chunk_list,
        block_entities,
        entities,
    };

    let header_bytes = fastnbt::to_bytes(&header).map_err(Error::NbtEncode)?;
    let data_bytes = gzip(&fastnbt::to_bytes(&block_data).map_err(Error::NbtEncode)?)?;
    if header_bytes.len() > u32::MAX as usize {
        return Err(Error::FrameTooLarge(header_bytes.len()));
    }
    if data_bytes.len() > u32::MAX as usize {
        return Err(Error::FrameTooLarge(data_bytes.len()));
    }

    let frame = BlueprintFrame {
        header: header_bytes,
        thumbnail: Vec::new(),
        data: data_bytes,
    };
    let mut out = Cursor::new(Vec::new());
    frame
        .write(&mut out)
        .map_err(|err| Error::Io(std::io::Error::other(err.to_string())))?;
    writer.write_all(&out.into_inner())?;
    Ok(())
}
