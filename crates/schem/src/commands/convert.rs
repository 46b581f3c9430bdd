use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct ConvertArgs {
    /// An input schematic file in any supported format
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// The output file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// The target format identifier (see `schem formats`)
    #[arg(short = 't', long, value_name = "FORMAT")]
    format: String,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ConvertArgs {
    pub fn handle(&self) -> Result<()> {
        let data = std::fs::read(&self.file)
            .into_diagnostic()
            .context(format!("reading {}", self.file.display()))?;

        let schem = schem_format::read(data.as_slice())?;
        let (width, height, length) = schem.dimensions();
        info!(
            "read {} as {} ({}x{}x{}, {} blocks)",
            self.file.display(),
            schem.format(),
            width,
            height,
            length,
            schem.block_count()
        );

        let mut out = if !self.overwrite {
            File::create_new(&self.output)
                .into_diagnostic()
                .context(format!("creating {}", self.output.display()))?
        } else {
            File::create(&self.output)
                .into_diagnostic()
                .context(format!("creating {}", self.output.display()))?
        };

        schem_format::write_format(&mut out, &self.format, &schem)?;
        out.flush().into_diagnostic()?;
        info!("wrote {} as {}", self.output.display(), self.format);

        Ok(())
    }
}
