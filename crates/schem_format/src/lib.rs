//! This library handles reading and writing the schematic file formats used
//! by Minecraft world editors.
//!
//! # Supported formats
//!
//! Every reader produces the same in-memory [`Schematic`] model, and every
//! writer consumes it, so any file can be converted to any format.
//!
//! | Identifier       | Container        | Block storage                          |
//! |------------------|------------------|----------------------------------------|
//! | `sponge_v1`      | gzip + NBT       | VarInt stream, global palette          |
//! | `sponge_v2`      | gzip + NBT       | VarInt stream, global palette, biomes  |
//! | `sponge_v3`      | gzip + NBT       | VarInt stream under `Schematic` child  |
//! | `litematica_v6`  | gzip + NBT       | Tightly packed longs, per-region       |
//! | `litematica_v7`  | gzip + NBT       | Tightly packed longs, per-region       |
//! | `axiom`          | framed binary    | Block-aligned longs, 16³ chunk palettes|
//! | `mcedit`         | gzip + NBT       | Raw id/meta byte pair per cell         |
//!
//! `litematica` is also registered as an alias: it reads either litematica
//! version and writes version 6.
//!
//! # Reading and writing
//!
//! ```no_run
//! fn convert(path: &str) -> schem_format::Result<()> {
//!     let data = std::fs::read(path)?;
//!     let schem = schem_format::read(data.as_slice())?;
//!
//!     let mut out = Vec::new();
//!     schem_format::write_format(&mut out, "sponge_v3", &schem)?;
//!     std::fs::write("converted.schem", out)?;
//!     Ok(())
//! }
//! ```
//!
//! Reads are strict: a failure anywhere aborts the call without partial
//! results. Writers treat features a format cannot hold (biomes in `mcedit`,
//! entities in `sponge_v1`) as silently absent rather than as errors.
//!
//! # Coordinate conventions
//!
//! Schematic-local coordinates are zero-based with the Y-major linear index
//! `x + z * width + y * width * length`; the `mcedit` codec alone uses the
//! `(y * length + z) * width + x` nesting on disk. The litematica and axiom
//! readers crop their input to the bounding box of non-air content and fold
//! the crop into the schematic offset.

pub mod axiom;
mod compression;
pub mod detect;
pub mod error;
pub mod litematica;
pub mod mcedit;
mod nbt;
pub mod packing;
pub mod palette;
pub mod read;
pub mod schematic;
pub mod sponge;
pub mod types;
pub mod varint;
pub mod write;

pub use detect::detect;
pub use error::{Error, Result};
pub use palette::Palette;
pub use read::{read, read_format};
pub use schematic::Schematic;
pub use types::{BlockEntity, BlockState, Entity, PropertyValue};
pub use write::{formats, write, write_format};
