use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use ra2_csf::read::{CsfReader, ExtraOffset, ReadOptions};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::PathBuf,
};
use tracing::info;

#[derive(Args)]
pub struct ExportArgs {
    /// An input CSF file, or a directory of them
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,

    /// The target JSON file, or directory when converting a directory
    #[arg(short, long, value_name = "PATH")]
    output: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,

    /// Read extra values at the offset the original string table tool used
    #[arg(long, default_value_t = false)]
    legacy_extra_offset: bool,
}

impl ExportArgs {
    pub fn handle(&self) -> Result<()> {
        let options = ReadOptions::builder()
            .extra_offset(if self.legacy_extra_offset {
                ExtraOffset::Legacy
            } else {
                ExtraOffset::Sequential
            })
            .build();

        for conversion in super::plan(&self.input, &self.output, "csf", "json")? {
            info!(
                "exporting {} to {}",
                conversion.input.display(),
                conversion.output.display()
            );

            let f = File::open(&conversion.input)
                .into_diagnostic()
                .context(format!("opening {}", conversion.input.display()))?;
            let csf = CsfReader::with_options(BufReader::new(f), options)
                .context(format!("reading {}", conversion.input.display()))?;
            info!("read {} entries", csf.len());

            let mut out = BufWriter::new(super::create_output(&conversion.output, self.overwrite)?);
            csf.table()
                .to_json_writer(&mut out)
                .context(format!("writing {}", conversion.output.display()))?;
            out.flush().into_diagnostic()?;
        }

        Ok(())
    }
}
