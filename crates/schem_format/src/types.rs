//! Base types shared by every schematic format.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use fastnbt::Value;

/// Block names that mean "no block stored here".
///
/// The axiom codec extends this set with `minecraft:structure_void` at its
/// own call sites.
pub const AIR_BLOCKS: [&str; 4] = ["", "minecraft:air", "minecraft:void_air", "minecraft:cave_air"];

/// A single typed block state property value.
///
/// Property vocabularies only ever use strings, small integers, and booleans;
/// anything else found on disk is carried as its string rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    String(String),
    Int(i32),
    Bool(bool),
}

impl PropertyValue {
    /// Parse a property value from its bracketed-state-string rendering.
    ///
    /// Exactly `true`/`false` become booleans, base-10 integers become 32-bit
    /// signed integers, everything else stays a string. Out-of-range numeric
    /// strings deliberately remain strings.
    pub fn parse(s: &str) -> PropertyValue {
        match s {
            "true" => PropertyValue::Bool(true),
            "false" => PropertyValue::Bool(false),
            _ => match s.parse::<i32>() {
                Ok(n) => PropertyValue::Int(n),
                Err(_) => PropertyValue::String(s.to_owned()),
            },
        }
    }

    /// Lift a decoded NBT scalar into a property value, if it has a sensible
    /// property rendering.
    pub(crate) fn from_nbt(value: &Value) -> Option<PropertyValue> {
        match value {
            Value::String(s) => Some(PropertyValue::String(s.clone())),
            Value::Byte(b) => Some(PropertyValue::Bool(*b != 0)),
            Value::Short(n) => Some(PropertyValue::Int(i32::from(*n))),
            Value::Int(n) => Some(PropertyValue::Int(*n)),
            Value::Long(n) => Some(PropertyValue::Int(*n as i32)),
            _ => None,
        }
    }

    /// The NBT scalar this value is stored as in `Properties` compounds.
    pub(crate) fn to_nbt(&self) -> Value {
        match self {
            PropertyValue::String(s) => Value::String(s.clone()),
            PropertyValue::Int(n) => Value::Int(*n),
            PropertyValue::Bool(b) => Value::Byte(i8::from(*b)),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => f.write_str(s),
            PropertyValue::Int(n) => write!(f, "{n}"),
            PropertyValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_owned())
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

/// A namespaced block identifier with its typed properties.
///
/// Properties are kept sorted by key so that the canonical string falls out
/// of plain iteration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockState {
    pub name: String,
    pub properties: BTreeMap<String, PropertyValue>,
}

impl BlockState {
    /// A block state with no properties.
    pub fn new(name: impl Into<String>) -> BlockState {
        BlockState {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Builder-style property insertion.
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> BlockState {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Whether this state is one of the air variants.
    pub fn is_air(&self) -> bool {
        AIR_BLOCKS.contains(&self.name.as_str())
    }

    /// The canonical rendering: `name` alone, or `name[k1=v1,k2=v2]` with
    /// keys in lexicographic order. Used as the palette key and as the
    /// on-disk key in sponge palettes.
    pub fn canonical(&self) -> String {
        self.to_string()
    }

    /// Parse a canonical block state string.
    ///
    /// Malformed property fragments are skipped rather than rejected; a bare
    /// name is always a valid state.
    pub fn parse(s: &str) -> BlockState {
        let Some((name, props)) = s.split_once('[') else {
            return BlockState::new(s);
        };
        let mut state = BlockState::new(name);
        for part in props.trim_end_matches(']').split(',') {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            state
                .properties
                .insert(key.to_owned(), PropertyValue::parse(value));
        }
        state
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.properties.is_empty() {
            return Ok(());
        }
        f.write_str("[")?;
        for (i, (key, value)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str("]")
    }
}

/// Per-position metadata attached to a block (chest contents, sign text, …).
///
/// The coordinates are local to the schematic and mirror the key the entry
/// is stored under.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockEntity {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    /// Remaining NBT fields, excluding the position and id keys.
    pub data: HashMap<String, Value>,
}

impl BlockEntity {
    pub fn new(id: impl Into<String>, x: i32, y: i32, z: i32) -> BlockEntity {
        BlockEntity {
            id: id.into(),
            x,
            y,
            z,
            data: HashMap::new(),
        }
    }
}

/// A mobile object with continuous position, rotation, and motion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    pub id: String,
    /// Position relative to the schematic origin.
    pub pos: [f64; 3],
    /// Yaw and pitch in degrees.
    pub rotation: [f32; 2],
    pub motion: [f64; 3],
    pub uuid: Option<[i32; 4]>,
    /// Remaining NBT fields, excluding id, Pos, Rotation, Motion, and UUID.
    pub data: HashMap<String, Value>,
}

impl Entity {
    pub fn new(id: impl Into<String>) -> Entity {
        Entity {
            id: id.into(),
            ..Entity::default()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn canonical_without_properties() {
        assert_eq!(BlockState::new("minecraft:stone").canonical(), "minecraft:stone");
    }

    #[test]
    fn canonical_sorts_keys() {
        let state = BlockState::new("minecraft:oak_stairs")
            .with_property("half", "bottom")
            .with_property("facing", "north");
        assert_eq!(
            state.canonical(),
            "minecraft:oak_stairs[facing=north,half=bottom]"
        );
    }

    #[test]
    fn canonical_is_insertion_order_independent() {
        let a = BlockState::new("minecraft:repeater")
            .with_property("delay", 2)
            .with_property("powered", false);
        let b = BlockState::new("minecraft:repeater")
            .with_property("powered", false)
            .with_property("delay", 2);
        assert_eq!(a, b);
        assert_eq!(a.canonical(), b.canonical());
    }

    #[test]
    fn parse_types_property_values() {
        let state = BlockState::parse("minecraft:repeater[delay=2,locked=false,shape=outer_left]");
        assert_eq!(state.name, "minecraft:repeater");
        assert_eq!(state.properties["delay"], PropertyValue::Int(2));
        assert_eq!(state.properties["locked"], PropertyValue::Bool(false));
        assert_eq!(
            state.properties["shape"],
            PropertyValue::String("outer_left".into())
        );
    }

    #[test]
    fn parse_round_trips_canonical() {
        for s in [
            "minecraft:stone",
            "minecraft:oak_log[axis=y]",
            "minecraft:water[level=0]",
            "minecraft:oak_stairs[facing=north,half=bottom,waterlogged=false]",
        ] {
            assert_eq!(BlockState::parse(s).canonical(), s);
        }
    }

    #[test]
    fn out_of_range_numbers_stay_strings() {
        let state = BlockState::parse("minecraft:thing[big=99999999999999999999]");
        assert_eq!(
            state.properties["big"],
            PropertyValue::String("99999999999999999999".into())
        );
    }

    #[test]
    fn air_variants() {
        assert!(BlockState::new("minecraft:air").is_air());
        assert!(BlockState::new("minecraft:cave_air").is_air());
        assert!(BlockState::new("minecraft:void_air").is_air());
        assert!(BlockState::new("").is_air());
        assert!(!BlockState::new("minecraft:stone").is_air());
        assert!(!BlockState::new("minecraft:structure_void").is_air());
    }
}
