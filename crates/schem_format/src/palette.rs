//! Insertion-ordered palette mapping block states to small indices.

use indexmap::IndexMap;

use crate::types::BlockState;

/// Deduplicating, insertion-ordered block state palette.
///
/// States are keyed by their canonical string, so two states that differ
/// only in property insertion order share an index. Palettes live only for
/// the duration of a single encode or decode.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    entries: IndexMap<String, BlockState>,
}

impl Palette {
    pub fn new() -> Palette {
        Palette::default()
    }

    /// A palette with `minecraft:air` pre-inserted at index 0, so that the
    /// sparse model's "no entry" maps to index 0 when writing.
    pub fn with_air() -> Palette {
        let mut palette = Palette::new();
        palette.add(BlockState::new("minecraft:air"));
        palette
    }

    /// The index for `state`, inserting it at the end if it is new.
    pub fn add(&mut self, state: BlockState) -> u32 {
        let key = state.canonical();
        if let Some(index) = self.entries.get_index_of(&key) {
            return index as u32;
        }
        self.entries.insert(key, state);
        (self.entries.len() - 1) as u32
    }

    /// The state stored at `index`.
    pub fn get(&self, index: u32) -> Option<&BlockState> {
        self.entries.get_index(index as usize).map(|(_, state)| state)
    }

    /// The index of `state`, if it has been added.
    pub fn index_of(&self, state: &BlockState) -> Option<u32> {
        self.entries
            .get_index_of(&state.canonical())
            .map(|index| index as u32)
    }

    /// Number of distinct states.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// States in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockState> {
        self.entries.values()
    }
}
