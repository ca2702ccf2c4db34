pub mod export;
pub mod import;
pub mod info;

use miette::{miette, Context, IntoDiagnostic, Result};
use std::{
    fs::File,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

#[derive(clap::Subcommand)]
pub enum CsfCommands {
    /// Convert CSF files into JSON
    Export(export::ExportArgs),
    /// Convert JSON files into CSF
    Import(import::ImportArgs),
    /// Show the header of a CSF file
    Info(info::InfoArgs),
}

impl CsfCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            CsfCommands::Export(export) => export.handle(),
            CsfCommands::Import(import) => import.handle(),
            CsfCommands::Info(info) => info.handle(),
        }
    }
}

/// A single file to convert
#[derive(Debug, PartialEq, Eq)]
pub struct Conversion {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// List the conversions for `input`.
///
/// A file converts straight to `output`. A directory converts every file with
/// the `from` extension below it to the same relative path under `output`,
/// with the extension replaced by `to`.
pub fn plan(input: &Path, output: &Path, from: &str, to: &str) -> Result<Vec<Conversion>> {
    if !input.is_dir() {
        return Ok(vec![Conversion {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
        }]);
    }

    let conversions = WalkDir::new(input)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| !e.file_type().is_dir())
        .filter(|e| has_extension(e.path(), from))
        .map(|e| -> Result<Conversion> {
            let relative = e.path().strip_prefix(input).into_diagnostic()?;
            Ok(Conversion {
                input: e.path().to_path_buf(),
                output: output.join(relative).with_extension(to),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if conversions.is_empty() {
        return Err(miette!("no .{} files found in {}", from, input.display()));
    }

    Ok(conversions)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

/// Create `path` and its parent directories, refusing to replace an
/// existing file unless `overwrite` is set
pub fn create_output(path: &Path, overwrite: bool) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .into_diagnostic()
            .context(format!("creating {}", parent.display()))?;
    }

    if !overwrite {
        File::create_new(path)
            .into_diagnostic()
            .context(format!("creating {}", path.display()))
    } else {
        File::create(path)
            .into_diagnostic()
            .context(format!("creating {}", path.display()))
    }
}
