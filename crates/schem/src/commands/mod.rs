pub mod convert;
pub mod info;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Convert a schematic file to another format
    Convert(convert::ConvertArgs),
    /// Show the contents of a schematic file
    Info(info::InfoArgs),
    /// List the supported format identifiers
    Formats,
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Convert(convert) => convert.handle(),
            Commands::Info(info) => info.handle(),
            Commands::Formats => {
                for format_id in schem_format::formats() {
                    println!("{format_id}");
                }
                Ok(())
            }
        }
    }
}
