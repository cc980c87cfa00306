//! Scene/vehicle pair processing
//!
//! Phases run strictly in sequence, each over an immutable snapshot of the
//! previous one: parse the scene, resolve names, compile the table, then
//! rewrite and strip each vehicle document against that table.

use crate::mapping::MappingTable;
use crate::report::{ReportEntry, ReportSummary};
use crate::resolve::{Rename, resolve};
use crate::rewrite::{BlockChange, rewrite};
use crate::strip::strip_elements;
use crate::RewriteOptions;
use i3dmap_error::Result;
use i3dmap_parser::SceneForest;
use log::info;

/// Result of indexing one scene document
#[derive(Debug, Clone)]
pub struct ScenePass {
    pub forest: SceneForest,
    pub renames: Vec<Rename>,
    pub table: MappingTable,
}

impl ScenePass {
    pub fn run(scene_text: &str) -> Result<Self> {
        let mut forest = SceneForest::parse(scene_text)?;
        let renames = resolve(&mut forest)?;
        let table = MappingTable::compile(&forest)?;
        Ok(Self {
            forest,
            renames,
            table,
        })
    }

    /// Scene document text with resolved names written back
    pub fn document(&self) -> String {
        self.forest.serialize()
    }

    pub fn is_changed(&self) -> bool {
        !self.renames.is_empty()
    }

    pub fn rename_entries(&self) -> Vec<ReportEntry> {
        self.renames
            .iter()
            .map(|rename| ReportEntry::Renamed {
                old_name: rename.old_name.clone(),
                new_name: rename.new_name.clone(),
                address: rename.address.encode(),
            })
            .collect()
    }

    /// Rewrite one vehicle document against this scene's table, then strip
    /// `strip_tags` from the result.
    pub fn apply_to_vehicle<S: AsRef<str>>(
        &self,
        vehicle_text: &str,
        options: &RewriteOptions,
        strip_tags: &[S],
    ) -> Result<VehicleOutcome> {
        let rewritten = rewrite(vehicle_text, &self.table, options)?;
        let stripped = strip_elements(&rewritten.document, strip_tags)?;
        if stripped.removed > 0 {
            info!("Removed {} memory usage tag(s)", stripped.removed);
        } else {
            info!("No memory usage tags found to remove");
        }
        Ok(VehicleOutcome {
            changed: stripped.document != vehicle_text,
            document: stripped.document,
            entries: rewritten.entries,
            block: rewritten.block,
            stripped: stripped.removed,
        })
    }
}

#[derive(Debug, Clone)]
pub struct VehicleOutcome {
    pub document: String,
    pub entries: Vec<ReportEntry>,
    pub block: BlockChange,
    pub stripped: usize,
    pub changed: bool,
}

impl VehicleOutcome {
    pub fn summary(&self) -> ReportSummary {
        ReportSummary::from_entries(&self.entries)
    }
}

/// Both rewritten documents of one pair and the combined report
#[derive(Debug, Clone)]
pub struct PairOutcome {
    pub scene_document: String,
    pub vehicle_document: String,
    pub entries: Vec<ReportEntry>,
    pub block: BlockChange,
    pub stripped: usize,
}

impl PairOutcome {
    pub fn summary(&self) -> ReportSummary {
        ReportSummary::from_entries(&self.entries)
    }
}

/// Process a single scene/vehicle pair in memory
pub fn process_pair<S: AsRef<str>>(
    scene_text: &str,
    vehicle_text: &str,
    options: &RewriteOptions,
    strip_tags: &[S],
) -> Result<PairOutcome> {
    let scene = ScenePass::run(scene_text)?;
    let vehicle = scene.apply_to_vehicle(vehicle_text, options, strip_tags)?;
    let mut entries = scene.rename_entries();
    entries.extend(vehicle.entries);
    Ok(PairOutcome {
        scene_document: scene.document(),
        vehicle_document: vehicle.document,
        entries,
        block: vehicle.block,
        stripped: vehicle.stripped,
    })
}
