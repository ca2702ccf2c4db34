use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::{OwoColorize, Stream::Stdout};
use ra2_csf::CsfReader;
use std::{fs::File, io::BufReader, path::PathBuf};

#[derive(Args)]
pub struct InfoArgs {
    /// An input CSF file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
}

impl InfoArgs {
    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.input)
            .into_diagnostic()
            .context(format!("opening {}", self.input.display()))?;
        let csf = CsfReader::new(BufReader::new(f))
            .context(format!("reading {}", self.input.display()))?;

        let header = csf.header();
        let rows = [
            ("magic", format!("{:?}", String::from_utf8_lossy(&header.magic))),
            ("version", header.version.to_string()),
            ("labels", header.labels.to_string()),
            ("strings", header.strings.to_string()),
            ("language", header.language.to_string()),
            ("entries", csf.len().to_string()),
            (
                "with extra",
                csf.table()
                    .values()
                    .filter(|e| e.extra.is_some())
                    .count()
                    .to_string(),
            ),
        ];

        for (name, value) in rows {
            println!(
                "{:>10}: {}",
                name.if_supports_color(Stdout, |t| t.bold()),
                value
            );
        }

        Ok(())
    }
}
