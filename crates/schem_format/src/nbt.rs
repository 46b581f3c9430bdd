//! Conversions between decoded NBT compounds and the model types.
//!
//! Two block entity shapes exist on disk: the sponge shape with a `Pos`
//! integer array and an uppercase `Id`, and the coordinate shape with
//! lowercase `x`, `y`, `z`, `id` used by litematica, axiom, and mcedit.
//! Entity compounds share one shape everywhere apart from the case of the
//! id key.

use std::collections::HashMap;

use fastnbt::{IntArray, Value};
use serde::{Deserialize, Serialize};

use crate::types::{BlockEntity, BlockState, Entity, PropertyValue};

/// Palette entry as stored by litematica regions and axiom chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StatePaletteEntry {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Properties", default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, Value>>,
}

impl StatePaletteEntry {
    pub fn from_state(state: &BlockState) -> StatePaletteEntry {
        let properties = if state.properties.is_empty() {
            None
        } else {
            Some(
                state
                    .properties
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_nbt()))
                    .collect(),
            )
        };
        StatePaletteEntry {
            name: state.name.clone(),
            properties,
        }
    }

    pub fn to_state(&self) -> BlockState {
        let mut state = BlockState::new(self.name.clone());
        if let Some(properties) = &self.properties {
            for (key, value) in properties {
                if let Some(value) = PropertyValue::from_nbt(value) {
                    state.properties.insert(key.clone(), value);
                }
            }
        }
        state
    }
}

pub(crate) fn compound_i32(compound: &HashMap<String, Value>, key: &str) -> Option<i32> {
    match compound.get(key) {
        Some(Value::Int(n)) => Some(*n),
        _ => None,
    }
}

pub(crate) fn compound_string(compound: &HashMap<String, Value>, key: &str) -> Option<String> {
    match compound.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

/// Three integers out of either an int array or a list of ints.
fn int3(value: &Value) -> Option<[i32; 3]> {
    match value {
        Value::IntArray(array) if array.len() >= 3 => Some([array[0], array[1], array[2]]),
        Value::List(items) if items.len() >= 3 => {
            let mut out = [0i32; 3];
            for (slot, item) in out.iter_mut().zip(items) {
                match item {
                    Value::Int(n) => *slot = *n,
                    _ => return None,
                }
            }
            Some(out)
        }
        _ => None,
    }
}

fn double3(value: &Value) -> Option<[f64; 3]> {
    match value {
        Value::List(items) if items.len() >= 3 => {
            let mut out = [0f64; 3];
            for (slot, item) in out.iter_mut().zip(items) {
                match item {
                    Value::Double(n) => *slot = *n,
                    _ => return None,
                }
            }
            Some(out)
        }
        _ => None,
    }
}

fn float2(value: &Value) -> Option<[f32; 2]> {
    match value {
        Value::List(items) if items.len() >= 2 => {
            let mut out = [0f32; 2];
            for (slot, item) in out.iter_mut().zip(items) {
                match item {
                    Value::Float(n) => *slot = *n,
                    _ => return None,
                }
            }
            Some(out)
        }
        _ => None,
    }
}

/// Block entity from the sponge `Pos`/`Id` shape. Keys other than those two
/// are retained in `data`.
pub(crate) fn block_entity_from_sponge(compound: &HashMap<String, Value>) -> BlockEntity {
    let mut be = BlockEntity::default();
    if let Some([x, y, z]) = compound.get("Pos").and_then(int3) {
        be.x = x;
        be.y = y;
        be.z = z;
    }
    if let Some(id) = compound_string(compound, "Id") {
        be.id = id;
    }
    for (key, value) in compound {
        if key != "Pos" && key != "Id" {
            be.data.insert(key.clone(), value.clone());
        }
    }
    be
}

/// Block entity record in the sponge shape at the given local coordinates.
pub(crate) fn block_entity_to_sponge(be: &BlockEntity, x: i32, y: i32, z: i32) -> HashMap<String, Value> {
    let mut compound = HashMap::with_capacity(be.data.len() + 2);
    compound.insert("Pos".to_owned(), Value::IntArray(IntArray::new(vec![x, y, z])));
    compound.insert("Id".to_owned(), Value::String(be.id.clone()));
    compound.extend(be.data.iter().map(|(k, v)| (k.clone(), v.clone())));
    compound
}

/// Block entity from the lowercase coordinate shape. The position and id
/// keys are excluded from `data` case-insensitively.
pub(crate) fn block_entity_from_coords(compound: &HashMap<String, Value>) -> BlockEntity {
    let mut be = BlockEntity::default();
    be.x = compound_i32(compound, "x").unwrap_or(0);
    be.y = compound_i32(compound, "y").unwrap_or(0);
    be.z = compound_i32(compound, "z").unwrap_or(0);
    if let Some(id) = compound_string(compound, "id") {
        be.id = id;
    }
    for (key, value) in compound {
        if matches!(key.to_ascii_lowercase().as_str(), "x" | "y" | "z" | "id") {
            continue;
        }
        be.data.insert(key.clone(), value.clone());
    }
    be
}

/// Block entity record in the coordinate shape at the given coordinates.
pub(crate) fn block_entity_to_coords(be: &BlockEntity, x: i32, y: i32, z: i32) -> HashMap<String, Value> {
    let mut compound = HashMap::with_capacity(be.data.len() + 4);
    compound.insert("x".to_owned(), Value::Int(x));
    compound.insert("y".to_owned(), Value::Int(y));
    compound.insert("z".to_owned(), Value::Int(z));
    compound.insert("id".to_owned(), Value::String(be.id.clone()));
    compound.extend(be.data.iter().map(|(k, v)| (k.clone(), v.clone())));
    compound
}

/// Entity from an on-disk compound; accepts either id key casing. The
/// position, rotation, motion, uuid, and id keys are excluded from `data`
/// case-insensitively.
pub(crate) fn entity_from_compound(compound: &HashMap<String, Value>) -> Entity {
    let mut entity = Entity::default();
    if let Some(id) = compound_string(compound, "Id").or_else(|| compound_string(compound, "id")) {
        entity.id = id;
    }
    if let Some(pos) = compound.get("Pos").and_then(double3) {
        entity.pos = pos;
    }
    if let Some(rotation) = compound.get("Rotation").and_then(float2) {
        entity.rotation = rotation;
    }
    if let Some(motion) = compound.get("Motion").and_then(double3) {
        entity.motion = motion;
    }
    if let Some(Value::IntArray(uuid)) = compound.get("UUID") {
        if uuid.len() >= 4 {
            entity.uuid = Some([uuid[0], uuid[1], uuid[2], uuid[3]]);
        }
    }
    for (key, value) in compound {
        if matches!(
            key.to_ascii_lowercase().as_str(),
            "id" | "pos" | "rotation" | "motion" | "uuid"
        ) {
            continue;
        }
        entity.data.insert(key.clone(), value.clone());
    }
    entity
}

/// Entity record with the id stored under `id_key` and the position already
/// translated by the caller.
pub(crate) fn entity_to_compound(
    entity: &Entity,
    id_key: &str,
    pos: [f64; 3],
) -> HashMap<String, Value> {
    let mut compound = HashMap::with_capacity(entity.data.len() + 5);
    compound.insert(
        "Pos".to_owned(),
        Value::List(pos.iter().map(|&p| Value::Double(p)).collect()),
    );
    compound.insert(
        "Rotation".to_owned(),
        Value::List(entity.rotation.iter().map(|&r| Value::Float(r)).collect()),
    );
    compound.insert(
        "Motion".to_owned(),
        Value::List(entity.motion.iter().map(|&m| Value::Double(m)).collect()),
    );
    compound.insert(id_key.to_owned(), Value::String(entity.id.clone()));
    if let Some(uuid) = entity.uuid {
        compound.insert(
            "UUID".to_owned(),
            Value::IntArray(IntArray::new(uuid.to_vec())),
        );
    }
    compound.extend(entity.data.iter().map(|(k, v)| (k.clone(), v.clone())));
    compound
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sponge_block_entity_round_trip() {
        let mut be = BlockEntity::new("minecraft:chest", 1, 2, 3);
        be.data
            .insert("Lock".to_owned(), Value::String("abc".to_owned()));
        let compound = block_entity_to_sponge(&be, 1, 2, 3);
        let back = block_entity_from_sponge(&compound);
        assert_eq!(back, be);
    }

    #[test]
    fn coordinate_block_entity_excludes_keys_case_insensitively() {
        let mut compound = HashMap::new();
        compound.insert("X".to_owned(), Value::Int(9));
        compound.insert("x".to_owned(), Value::Int(4));
        compound.insert("y".to_owned(), Value::Int(5));
        compound.insert("z".to_owned(), Value::Int(6));
        compound.insert("id".to_owned(), Value::String("minecraft:sign".to_owned()));
        compound.insert("Text1".to_owned(), Value::String("hi".to_owned()));
        let be = block_entity_from_coords(&compound);
        assert_eq!((be.x, be.y, be.z), (4, 5, 6));
        assert_eq!(be.id, "minecraft:sign");
        assert_eq!(be.data.len(), 1);
        assert!(be.data.contains_key("Text1"));
    }

    #[test]
    fn entity_round_trip_with_uuid() {
        let mut entity = Entity::new("minecraft:armor_stand");
        entity.pos = [0.5, 1.0, 2.5];
        entity.rotation = [90.0, 0.0];
        entity.motion = [0.0, -0.1, 0.0];
        entity.uuid = Some([1, 2, 3, 4]);
        entity
            .data
            .insert("Invisible".to_owned(), Value::Byte(1));
        let compound = entity_to_compound(&entity, "id", entity.pos);
        let back = entity_from_compound(&compound);
        assert_eq!(back, entity);
    }

    #[test]
    fn sponge_positions_accept_lists() {
        let mut compound = HashMap::new();
        compound.insert(
            "Pos".to_owned(),
            Value::List(vec![Value::Int(7), Value::Int(8), Value::Int(9)]),
        );
        compound.insert("Id".to_owned(), Value::String("minecraft:barrel".to_owned()));
        let be = block_entity_from_sponge(&compound);
        assert_eq!((be.x, be.y, be.z), (7, 8, 9));
    }

    #[test]
    fn palette_entry_keeps_typed_properties() {
        let state = BlockState::new("minecraft:repeater")
            .with_property("delay", 2)
            .with_property("locked", false)
            .with_property("facing", "north");
        let entry = StatePaletteEntry::from_state(&state);
        assert_eq!(entry.to_state(), state);
    }
}
