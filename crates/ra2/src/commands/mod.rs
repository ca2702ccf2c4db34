pub mod csf;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle CSF string tables
    Csf {
        #[command(subcommand)]
        command: csf::CsfCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Csf { command } => command.handle(),
        }
    }
}
