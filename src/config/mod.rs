pub mod toml_config;

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "mkusers")]
#[command(about = "Create OS user accounts in bulk from a file of names")]
pub struct CliConfig {
    /// File with one name per line (UTF-8, blank lines ignored)
    pub names_file: PathBuf,

    /// TOML file overriding tool names and paths
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
