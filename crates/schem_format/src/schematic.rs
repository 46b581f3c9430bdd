//! Sparse in-memory schematic storage shared by every codec.

use std::collections::HashMap;

use fastnbt::Value;

use crate::types::{BlockEntity, BlockState, Entity};

/// Monotonic data-version thresholds, newest first. The label of the first
/// threshold at or below the data version wins.
const VERSION_THRESHOLDS: &[(i32, &str)] = &[
    (4665, "1.21.11"),
    (4556, "1.21.10"),
    (4554, "1.21.9"),
    (4440, "1.21.8"),
    (4438, "1.21.7"),
    (4435, "1.21.6"),
    (4325, "1.21.5"),
    (4189, "1.21.4"),
    (4082, "1.21.3"),
    (4080, "1.21.2"),
    (3955, "1.21.1"),
    (3953, "1.21"),
    (3839, "1.20.6"),
    (3837, "1.20.5"),
    (3700, "1.20.4"),
    (3578, "1.20.2"),
    (3465, "1.20.1"),
    (3463, "1.20"),
    (3337, "1.19.4"),
    (3218, "1.19.3"),
    (3120, "1.19.2"),
    (3117, "1.19.1"),
    (3105, "1.19"),
    (2975, "1.18.2"),
    (2860, "1.18"),
    (2730, "1.17.1"),
    (2724, "1.17"),
    (2586, "1.16.5"),
    (2566, "1.16"),
    (2230, "1.15.2"),
    (2225, "1.15"),
    (1976, "1.14.4"),
    (1952, "1.14"),
    (1631, "1.13.2"),
    (1628, "1.13.1"),
    (1519, "1.13"),
    (1343, "1.12.2"),
    (1241, "1.12.1"),
    (1139, "1.12"),
    (922, "1.11.2"),
    (921, "1.11.1"),
    (819, "1.11"),
    (512, "1.10.2"),
    (511, "1.10.1"),
    (510, "1.10"),
    (184, "1.9.4"),
    (183, "1.9.3"),
    (176, "1.9.2"),
    (175, "1.9.1"),
    (169, "1.9"),
];

/// A finite volume of blocks with optional block entities, entities, biomes,
/// and metadata, decoupled from any on-disk layout.
///
/// Storage is sparse: only non-air blocks are kept, keyed by the Y-major
/// linear index `x + z * width + y * width * length`. Out-of-range writes are
/// silently ignored, and storing an air variant clears the cell, so the block
/// map never holds an air entry.
#[derive(Debug, Clone, Default)]
pub struct Schematic {
    width: i32,
    height: i32,
    length: i32,
    offset: [i32; 3],
    blocks: HashMap<usize, BlockState>,
    block_entities: HashMap<usize, BlockEntity>,
    biomes: HashMap<usize, String>,
    entities: Vec<Entity>,
    metadata: HashMap<String, Value>,
    format: String,
    data_version: i32,
}

impl Schematic {
    /// An empty schematic with the given dimensions and format identifier.
    pub fn new(width: i32, height: i32, length: i32, format: impl Into<String>) -> Schematic {
        Schematic {
            width,
            height,
            length,
            format: format.into(),
            ..Schematic::default()
        }
    }

    /// Dimensions in blocks: `(width, height, length)`.
    pub fn dimensions(&self) -> (i32, i32, i32) {
        (self.width, self.height, self.length)
    }

    /// Total cell count of the volume.
    pub fn volume(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize) * (self.length.max(0) as usize)
    }

    /// Origin offset of the schematic.
    pub fn offset(&self) -> (i32, i32, i32) {
        (self.offset[0], self.offset[1], self.offset[2])
    }

    pub fn set_offset(&mut self, x: i32, y: i32, z: i32) {
        self.offset = [x, y, z];
    }

    fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height && z >= 0 && z < self.length
    }

    fn index(&self, x: i32, y: i32, z: i32) -> usize {
        (x + z * self.width + y * self.width * self.length) as usize
    }

    /// The block at `(x, y, z)`, or `None` for air or out-of-range positions.
    pub fn block(&self, x: i32, y: i32, z: i32) -> Option<&BlockState> {
        if !self.in_bounds(x, y, z) {
            return None;
        }
        self.blocks.get(&self.index(x, y, z))
    }

    /// Store a block, or clear the cell with `None`. Air variants clear the
    /// cell too; writes outside the volume are ignored.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: Option<BlockState>) {
        if !self.in_bounds(x, y, z) {
            return;
        }
        let idx = self.index(x, y, z);
        match block {
            Some(block) if !block.is_air() => {
                self.blocks.insert(idx, block);
            }
            _ => {
                self.blocks.remove(&idx);
            }
        }
    }

    /// Number of stored (non-air) blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// The block entity at `(x, y, z)`, if any.
    pub fn block_entity(&self, x: i32, y: i32, z: i32) -> Option<&BlockEntity> {
        if !self.in_bounds(x, y, z) {
            return None;
        }
        self.block_entities.get(&self.index(x, y, z))
    }

    /// Store a block entity, or remove one with `None`. The entry's
    /// coordinates are rewritten to match its storage position.
    pub fn set_block_entity(&mut self, x: i32, y: i32, z: i32, block_entity: Option<BlockEntity>) {
        if !self.in_bounds(x, y, z) {
            return;
        }
        let idx = self.index(x, y, z);
        match block_entity {
            Some(mut be) => {
                be.x = x;
                be.y = y;
                be.z = z;
                self.block_entities.insert(idx, be);
            }
            None => {
                self.block_entities.remove(&idx);
            }
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn remove_entity(&mut self, index: usize) -> Option<Entity> {
        if index < self.entities.len() {
            Some(self.entities.remove(index))
        } else {
            None
        }
    }

    /// The biome at `(x, y, z)`: the 3D entry if present, otherwise the 2D
    /// column entry.
    pub fn biome(&self, x: i32, y: i32, z: i32) -> Option<&str> {
        if x < 0 || x >= self.width || z < 0 || z >= self.length {
            return None;
        }
        if y >= 0 && y < self.height {
            if let Some(biome) = self.biomes.get(&self.index(x, y, z)) {
                return Some(biome.as_str());
            }
        }
        self.biomes
            .get(&((x + z * self.width) as usize))
            .map(String::as_str)
    }

    /// Store a biome 3D when `y` is in range, 2D per column otherwise.
    /// `None` clears the entry.
    pub fn set_biome(&mut self, x: i32, y: i32, z: i32, biome: Option<String>) {
        if x < 0 || x >= self.width || z < 0 || z >= self.length {
            return;
        }
        let idx = if y >= 0 && y < self.height {
            self.index(x, y, z)
        } else {
            (x + z * self.width) as usize
        };
        match biome {
            Some(biome) if !biome.is_empty() => {
                self.biomes.insert(idx, biome);
            }
            _ => {
                self.biomes.remove(&idx);
            }
        }
    }

    /// Whether any biome entry is stored.
    pub fn has_biomes(&self) -> bool {
        !self.biomes.is_empty()
    }

    pub fn metadata(&self) -> &HashMap<String, Value> {
        &self.metadata
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: Value) {
        self.metadata.insert(key.into(), value);
    }

    /// A metadata string value, if present and a string.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        match self.metadata.get(key) {
            Some(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// A metadata long value, if present and a long.
    pub fn metadata_i64(&self, key: &str) -> Option<i64> {
        match self.metadata.get(key) {
            Some(Value::Long(n)) => Some(*n),
            _ => None,
        }
    }

    /// The format identifier this schematic was decoded from, or was
    /// constructed for.
    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn set_format(&mut self, format: impl Into<String>) {
        self.format = format.into();
    }

    /// The Minecraft data version, or 0 when not applicable.
    pub fn data_version(&self) -> i32 {
        self.data_version
    }

    pub fn set_data_version(&mut self, data_version: i32) {
        self.data_version = data_version;
    }

    /// The coarse Minecraft version label for the data version, or an empty
    /// string below the namespaced-id horizon. Informational only; no codec
    /// rejects on it.
    pub fn version(&self) -> &'static str {
        VERSION_THRESHOLDS
            .iter()
            .find(|(threshold, _)| self.data_version >= *threshold)
            .map(|(_, label)| *label)
            .unwrap_or("")
    }
}
