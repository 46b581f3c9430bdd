use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::path::PathBuf;

#[derive(Args)]
pub struct InfoArgs {
    /// A schematic file in any supported format
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl InfoArgs {
    pub fn handle(&self) -> Result<()> {
        let data = std::fs::read(&self.file)
            .into_diagnostic()
            .context(format!("reading {}", self.file.display()))?;
        let schem = schem_format::read(data.as_slice())?;

        let (width, height, length) = schem.dimensions();
        let (offset_x, offset_y, offset_z) = schem.offset();

        println!("format:       {}", schem.format());
        println!("dimensions:   {width}x{height}x{length}");
        println!("offset:       ({offset_x}, {offset_y}, {offset_z})");
        println!("data version: {}", schem.data_version());
        if !schem.version().is_empty() {
            println!("version:      {}", schem.version());
        }
        println!("blocks:       {}", schem.block_count());
        println!("entities:     {}", schem.entities().len());

        if !schem.metadata().is_empty() {
            println!("metadata:");
            let mut keys: Vec<_> = schem.metadata().keys().collect();
            keys.sort();
            for key in keys {
                println!("  {key}: {:?}", schem.metadata()[key]);
            }
        }

        Ok(())
    }
}
