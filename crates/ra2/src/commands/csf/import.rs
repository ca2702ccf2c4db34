use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use ra2_csf::{types::DEFAULT_LANGUAGE, write::CsfWriterOptions, CsfWriter, StringTable};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};
use tracing::info;

#[derive(Args)]
pub struct ImportArgs {
    /// An input JSON file, or a directory of them
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,

    /// The target CSF file, or directory when converting a directory
    #[arg(short, long, value_name = "PATH")]
    output: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,

    /// Language code stored in the CSF header
    #[arg(short, long, default_value_t = DEFAULT_LANGUAGE)]
    language: u32,
}

impl ImportArgs {
    pub fn handle(&self) -> Result<()> {
        let options = CsfWriterOptions::builder().language(self.language).build();

        for conversion in super::plan(&self.input, &self.output, "json", "csf")? {
            import_file(&conversion.input, &conversion.output, options, self.overwrite)?;
        }

        Ok(())
    }
}

/// Convert one JSON file into a CSF file.
///
/// The table is encoded in memory first; `output` is only created once that
/// succeeded.
pub fn import_file(
    input: &Path,
    output: &Path,
    options: CsfWriterOptions,
    overwrite: bool,
) -> Result<()> {
    info!("importing {} to {}", input.display(), output.display());

    let f = File::open(input)
        .into_diagnostic()
        .context(format!("opening {}", input.display()))?;
    let table = StringTable::from_json_reader(BufReader::new(f))
        .context(format!("reading {}", input.display()))?;
    info!("read {} entries", table.len());

    let mut csf = CsfWriter::new(Vec::new(), options);
    csf.write_table(&table)
        .context(format!("encoding {}", input.display()))?;
    let data = csf.finish();

    let mut out = super::create_output(output, overwrite)?;
    out.write_all(&data)
        .into_diagnostic()
        .context(format!("writing {}", output.display()))?;

    Ok(())
}
