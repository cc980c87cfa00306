//! Argument groups shared between subcommands

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct MapArgs {
    /// Vehicle XML files or modDesc.xml manifests
    pub files: Vec<PathBuf>,

    /// Do everything except writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Write a JSON report of every pair to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SceneArgs {
    /// Scene (.i3d) file
    #[arg(index = 1)]
    pub scene: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct TreeFormatArgs {
    #[arg(
        long,
        help = "Use ASCII characters instead of Unicode box characters for tree output"
    )]
    pub ascii: bool,
}
