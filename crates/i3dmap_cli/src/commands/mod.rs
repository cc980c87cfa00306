pub mod lookup;
pub mod map;
pub mod tree;

// Re-export command functions for main.rs
pub use lookup::cmd_lookup;
pub use map::cmd_map;
pub use tree::cmd_tree;

use crate::util::OutputHandler;
use i3dmap_editor::ScenePass;
use i3dmap_error::{I3dMapError, Result};
use std::path::Path;

/// Command execution context containing common parameters
pub struct CommandContext<'a> {
    pub config: &'a crate::config::MapperConfig,
    pub output: &'a OutputHandler,
    pub verbose: u8,
    pub write_log_file: bool,
    pub jobs: Option<std::num::NonZeroUsize>,
}

/// Read and index a scene document without writing anything
pub fn load_scene(path: &Path) -> Result<ScenePass> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| I3dMapError::from(e).with_file_path(path))?;
    ScenePass::run(&text).map_err(|e| e.with_file_path(path))
}
