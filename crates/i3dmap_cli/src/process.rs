//! Batch processing behind the `map` command
//!
//! Inputs are expanded into vehicle jobs (manifests list their store items),
//! jobs are grouped by the scene document they target, and each group is
//! processed as one unit: the scene is indexed once and every vehicle of the
//! group is rewritten against the same table. Groups share nothing and run on
//! a rayon pool; their log lines are buffered and flushed in group order.

use crate::config::MapperConfig;
use crate::logfile::{LogBuffer, RunLog, Severity};
use crate::manifest;
use crate::paths::{self, SceneLocation};
use crate::util::display_relative;
use i3dmap_editor::{
    BlockChange, ReportEntry, ReportSummary, RewriteOptions, ScenePass, VehicleOutcome,
};
use i3dmap_error::{DocumentErrorKind, I3dMapError, Result};
use indexmap::{IndexMap, IndexSet};
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

const RULE: &str = "====================================";

/// Settings shared by every group of a run
#[derive(Debug, Clone)]
pub struct MapContext {
    pub options: RewriteOptions,
    pub memory_tags: Vec<String>,
    pub dry_run: bool,
}

impl MapContext {
    pub fn new(config: &MapperConfig, dry_run: bool) -> Self {
        Self {
            options: config.rewrite_options(),
            memory_tags: config.memory_tags.clone(),
            dry_run,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VehicleJob {
    pub vehicle: PathBuf,
    pub mod_root: PathBuf,
}

#[derive(Debug, Clone)]
struct PlannedJob {
    job: VehicleJob,
    text: String,
}

#[derive(Debug, Clone)]
pub struct SceneGroup {
    scene: PathBuf,
    jobs: Vec<PlannedJob>,
}

impl SceneGroup {
    pub fn scene(&self) -> &Path {
        &self.scene
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }
}

/// Machine-readable record of one processed pair
#[derive(Debug, Clone, Serialize)]
pub struct PairReport {
    pub vehicle: PathBuf,
    pub scene: PathBuf,
    pub summary: ReportSummary,
    pub entries: Vec<ReportEntry>,
}

#[derive(Debug, Default)]
pub struct GroupResult {
    pub log: LogBuffer,
    pub reports: Vec<PairReport>,
    pub succeeded: usize,
    pub failed: usize,
}

/// Tallies for a whole run
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub summary: ReportSummary,
    pub reports: Vec<PairReport>,
}

impl BatchOutcome {
    pub fn absorb(&mut self, result: GroupResult, log: &mut RunLog) {
        log.flush(&result.log);
        self.succeeded += result.succeeded;
        self.failed += result.failed;
        for report in &result.reports {
            self.summary.merge(&report.summary);
        }
        self.reports.extend(result.reports);
    }
}

/// Expand command line inputs into vehicle jobs, logging as it goes
pub fn discover(inputs: &[PathBuf], log: &mut RunLog, outcome: &mut BatchOutcome) -> Vec<VehicleJob> {
    let mut jobs = Vec::new();
    for input in inputs {
        let input = std::path::absolute(input).unwrap_or_else(|_| input.clone());
        if !input.is_file() {
            log.print_only(
                Severity::Error,
                &format!("File not found: {}", input.display()),
            );
            outcome.failed += 1;
            continue;
        }
        let mod_root = paths::find_mod_root(&input);
        if log.start(&mod_root) {
            log.emit_text(
                &mod_root,
                Severity::Info,
                format!("Detected mod root: {}", mod_root.display()),
            );
        }

        if paths::is_manifest(&input) {
            log.emit_text(
                &mod_root,
                Severity::Info,
                format!("Processing modDesc: {}", input.display()),
            );
            jobs.extend(discover_manifest(&input, log, outcome));
        } else {
            log.emit_text(
                &mod_root,
                Severity::Info,
                format!("Processing vehicle XML: {}", input.display()),
            );
            jobs.push(VehicleJob {
                vehicle: input,
                mod_root,
            });
        }
    }
    jobs
}

fn discover_manifest(manifest: &Path, log: &mut RunLog, outcome: &mut BatchOutcome) -> Vec<VehicleJob> {
    let mod_root = manifest
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    log.emit_text(&mod_root, Severity::Info, "");
    log.emit_text(&mod_root, Severity::Info, RULE);
    log.emit_text(
        &mod_root,
        Severity::Info,
        format!("Mod root: {}", mod_root.display()),
    );
    log.emit_text(&mod_root, Severity::Info, RULE);

    let files = std::fs::read_to_string(manifest)
        .map_err(|e| I3dMapError::from(e).with_file_path(manifest))
        .and_then(|text| manifest::store_item_files(&text));
    let files = match files {
        Ok(files) => files,
        Err(e) if e.document_kind() == Some(&DocumentErrorKind::MissingStoreItems) => {
            log.emit_text(&mod_root, Severity::Warn, e.user_message());
            return Vec::new();
        }
        Err(e) => {
            log.emit_text(
                &mod_root,
                Severity::Error,
                format!("Failed to parse modDesc: {}", e.user_message()),
            );
            outcome.failed += 1;
            return Vec::new();
        }
    };
    log.emit_text(
        &mod_root,
        Severity::Info,
        format!("Found {} storeItem entries", files.len()),
    );

    let mut jobs = Vec::new();
    for file in files {
        let vehicle = paths::clean_path(&mod_root, &file);
        if !vehicle.is_file() {
            log.emit_text(
                &mod_root,
                Severity::Error,
                format!("Vehicle XML not found: {}", vehicle.display()),
            );
            outcome.failed += 1;
            continue;
        }
        jobs.push(VehicleJob {
            vehicle,
            mod_root: mod_root.clone(),
        });
    }
    jobs
}

/// Read every vehicle document and group the jobs by target scene
pub fn plan(jobs: Vec<VehicleJob>, log: &mut RunLog, outcome: &mut BatchOutcome) -> Vec<SceneGroup> {
    let mut seen = IndexSet::new();
    let mut groups: IndexMap<PathBuf, Vec<PlannedJob>> = IndexMap::new();

    for job in jobs {
        if !seen.insert(job.vehicle.clone()) {
            debug!("{} already queued", job.vehicle.display());
            continue;
        }
        let root = job.mod_root.clone();
        let rel = display_relative(&job.vehicle, &root);

        let text = match std::fs::read_to_string(&job.vehicle) {
            Ok(text) => text,
            Err(e) => {
                log.emit_text(&root, Severity::Error, format!("Cannot read {rel}: {e}"));
                outcome.failed += 1;
                continue;
            }
        };
        let filename = match manifest::scene_filename(&text) {
            Ok(filename) => filename,
            Err(e) => {
                let reason = match e.document_kind() {
                    Some(DocumentErrorKind::MissingBaseFilename) => {
                        "<base><filename> tag missing or empty".to_string()
                    }
                    _ => e.user_message(),
                };
                log.emit_text(&root, Severity::Error, format!("{rel}: {reason}. Skipping."));
                outcome.failed += 1;
                continue;
            }
        };
        match paths::scene_location(&root, &filename) {
            SceneLocation::GameData(name) => {
                log.emit_text(
                    &root,
                    Severity::Info,
                    format!("{rel}: i3d file is in $data ({name}). Skipping."),
                );
                outcome.skipped += 1;
            }
            SceneLocation::Mod(scene) if !scene.is_file() => {
                log.emit_text(
                    &root,
                    Severity::Error,
                    format!("{rel}: .i3d file not found: {}", scene.display()),
                );
                outcome.failed += 1;
            }
            SceneLocation::Mod(scene) => {
                groups
                    .entry(scene)
                    .or_default()
                    .push(PlannedJob { job, text });
            }
        }
    }

    groups
        .into_iter()
        .map(|(scene, jobs)| SceneGroup { scene, jobs })
        .collect()
}

/// Process all groups on a pool of `jobs` threads (all cores when `None`),
/// returning results in group order
pub fn run_groups(
    groups: &[SceneGroup],
    ctx: &MapContext,
    jobs: Option<NonZeroUsize>,
) -> Result<Vec<GroupResult>> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = jobs {
        builder = builder.num_threads(threads.get());
    }
    let pool = builder.build().map_err(|e| {
        I3dMapError::cli_execution_failed(format!("Cannot start worker pool: {e}"))
    })?;
    info!(
        "Processing {} scene group(s) on {} thread(s)",
        groups.len(),
        pool.current_num_threads()
    );
    Ok(pool.install(|| {
        groups
            .par_iter()
            .map(|group| {
                debug!(
                    "Indexing {} for {} vehicle(s)",
                    group.scene().display(),
                    group.len()
                );
                process_group(group, ctx)
            })
            .collect()
    }))
}

/// Index one scene and rewrite every vehicle document of its group
pub fn process_group(group: &SceneGroup, ctx: &MapContext) -> GroupResult {
    let mut result = GroupResult::default();
    let Some(first) = group.jobs.first() else {
        return result;
    };
    let root = first.job.mod_root.as_path();
    let scene_rel = display_relative(&group.scene, root);
    result
        .log
        .info(root, format!("i3d path resolved to: {scene_rel}"));

    let pass = std::fs::read_to_string(&group.scene)
        .map_err(|e| I3dMapError::from(e).with_file_path(&group.scene))
        .and_then(|text| ScenePass::run(&text).map_err(|e| e.with_file_path(&group.scene)));
    let pass = match pass {
        Ok(pass) => pass,
        Err(e) => {
            result.log.error(root, format!("ERROR while indexing {scene_rel}: {}", e.user_message()));
            for planned in &group.jobs {
                result.log.error(
                    &planned.job.mod_root,
                    format!(
                        "Skipping {}",
                        display_relative(&planned.job.vehicle, &planned.job.mod_root)
                    ),
                );
            }
            result.failed = group.jobs.len();
            return result;
        }
    };

    let rename_entries = pass.rename_entries();
    for entry in &rename_entries {
        result.log.info(root, entry.to_string());
    }
    if pass.is_changed() {
        write_document(&group.scene, &pass.document(), root, ctx, &mut result.log);
    }

    for planned in &group.jobs {
        let job = &planned.job;
        let rel = display_relative(&job.vehicle, &job.mod_root);
        result.log.info(&job.mod_root, "");
        result.log.info(&job.mod_root, RULE);
        result.log.info(&job.mod_root, format!("Processing XML: {rel}"));
        result.log.info(&job.mod_root, RULE);

        match pass.apply_to_vehicle(&planned.text, &ctx.options, &ctx.memory_tags) {
            Ok(outcome) => {
                log_vehicle(&outcome, &job.mod_root, pass.renames.len(), &mut result.log);
                let written = !outcome.changed
                    || write_document(&job.vehicle, &outcome.document, &job.mod_root, ctx, &mut result.log);
                if written {
                    result.succeeded += 1;
                    result
                        .log
                        .success(&job.mod_root, "Success. Mod XML and i3d updated.");
                } else {
                    result.failed += 1;
                }
                let mut entries = rename_entries.clone();
                entries.extend(outcome.entries);
                result.reports.push(PairReport {
                    vehicle: job.vehicle.clone(),
                    scene: group.scene.clone(),
                    summary: ReportSummary::from_entries(&entries),
                    entries,
                });
            }
            Err(e) => {
                result.log.error(
                    &job.mod_root,
                    format!("ERROR while processing {rel}: {}", e.user_message()),
                );
                result.failed += 1;
            }
        }
    }
    result
}

fn log_vehicle(outcome: &VehicleOutcome, root: &Path, renamed: usize, log: &mut LogBuffer) {
    for entry in &outcome.entries {
        if entry.is_anomaly() {
            log.warn(root, entry.to_string());
        } else {
            log.detail(root, entry.to_string());
        }
    }
    let mut summary = outcome.summary();
    summary.renamed = renamed;
    for line in summary.lines() {
        log.info(root, line);
    }
    match outcome.block {
        BlockChange::Replaced { removed } => {
            log.info(root, "Found existing <i3dMappings>, replacing contents.");
            if removed > 0 {
                log.warn(root, format!("Removed {removed} extra <i3dMappings> block(s)."));
            }
        }
        BlockChange::Inserted => log.info(root, "Adding new <i3dMappings> section."),
    }
    if outcome.stripped > 0 {
        log.info(root, format!("Removed {} memory usage tag(s).", outcome.stripped));
    } else {
        log.info(root, "No memory usage tags found to remove.");
    }
}

/// Write `text` to `path` unless this is a dry run. Returns false on failure.
fn write_document(path: &Path, text: &str, root: &Path, ctx: &MapContext, log: &mut LogBuffer) -> bool {
    let rel = display_relative(path, root);
    if ctx.dry_run {
        log.info(root, format!("Dry run: would update {rel}"));
        return true;
    }
    match std::fs::write(path, text) {
        Ok(()) => {
            log.info(root, format!("Updated file written: {rel}"));
            true
        }
        Err(e) => {
            log.error(root, format!("Cannot write {rel}: {e}"));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::OutputHandler;
    use tempfile::TempDir;

    const SCENE: &str = "<i3D>\n  <Scene>\n    <TransformGroup name=\"root\">\n      <Light name=\"Light\"/>\n      <Light name=\"Light\"/>\n    </TransformGroup>\n  </Scene>\n</i3D>\n";

    fn vehicle(scene: &str, node: &str) -> String {
        format!(
            "<vehicle>\n    <base>\n        <filename>{scene}</filename>\n    </base>\n    <light node=\"{node}\"/>\n    <audioMemoryUsage>1</audioMemoryUsage>\n</vehicle>\n"
        )
    }

    struct ModDir {
        tmp: TempDir,
    }

    impl ModDir {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            std::fs::write(tmp.path().join("modDesc.xml"), "<modDesc/>").unwrap();
            Self { tmp }
        }

        fn write(&self, rel: &str, text: &str) -> PathBuf {
            let path = self.tmp.path().join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, text).unwrap();
            path
        }

        fn root(&self) -> &Path {
            self.tmp.path()
        }
    }

    fn quiet_log() -> RunLog {
        RunLog::new("log.txt", true, false, OutputHandler::new(true))
    }

    #[test]
    fn test_groups_by_scene() {
        let mod_dir = ModDir::new();
        mod_dir.write("vehicles/a.i3d", SCENE);
        mod_dir.write("vehicles/b.i3d", SCENE);
        let a1 = mod_dir.write("a1.xml", &vehicle("vehicles/a.i3d", "0>0"));
        let b = mod_dir.write("b.xml", &vehicle("vehicles\\b.i3d", "0>1"));
        let a2 = mod_dir.write("a2.xml", &vehicle("./vehicles/a.i3d", "0>1"));

        let mut log = quiet_log();
        let mut outcome = BatchOutcome::default();
        let jobs = discover(&[a1, b, a2], &mut log, &mut outcome);
        let groups = plan(jobs, &mut log, &mut outcome);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert!(groups[0].scene().ends_with("vehicles/a.i3d"));
        assert_eq!(outcome.failed, 0);
    }

    #[test]
    fn test_game_data_and_missing_scene() {
        let mod_dir = ModDir::new();
        let game = mod_dir.write("game.xml", &vehicle("$data/vehicles/x.i3d", "0>"));
        let missing = mod_dir.write("missing.xml", &vehicle("nothing.i3d", "0>"));
        let no_base = mod_dir.write("nobase.xml", "<vehicle/>");

        let mut log = quiet_log();
        let mut outcome = BatchOutcome::default();
        let jobs = discover(&[game, missing, no_base], &mut log, &mut outcome);
        assert_eq!(jobs.len(), 3);
        let groups = plan(jobs, &mut log, &mut outcome);
        assert!(groups.is_empty());
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.failed, 2);
    }

    #[test]
    fn test_process_group_writes_both_documents() {
        let mod_dir = ModDir::new();
        let scene = mod_dir.write("t.i3d", SCENE);
        let xml = mod_dir.write("t.xml", &vehicle("t.i3d", "0>1"));

        let mut log = quiet_log();
        let mut outcome = BatchOutcome::default();
        let jobs = discover(&[xml.clone()], &mut log, &mut outcome);
        let groups = plan(jobs, &mut log, &mut outcome);
        let ctx = MapContext::new(&MapperConfig::default(), false);
        let results = run_groups(&groups, &ctx, NonZeroUsize::new(2)).unwrap();
        for result in results {
            outcome.absorb(result, &mut log);
        }

        assert_eq!((outcome.succeeded, outcome.failed), (1, 0));
        assert_eq!(outcome.summary.renamed, 2);
        assert_eq!(outcome.summary.rewritten, 1);
        let scene_text = std::fs::read_to_string(scene).unwrap();
        assert!(scene_text.contains("<Light name=\"Light_002\"/>"));
        let xml_text = std::fs::read_to_string(xml).unwrap();
        assert!(xml_text.contains("<light node=\"Light_002\"/>"));
        assert!(!xml_text.contains("audioMemoryUsage"));

        let log_text = std::fs::read_to_string(mod_dir.root().join("log.txt")).unwrap();
        assert!(log_text.contains("Replaced 1 numeric node reference(s) with i3dMapping IDs"));
        assert!(log_text.contains("2 duplicate node name(s) were renamed"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let mod_dir = ModDir::new();
        let scene = mod_dir.write("t.i3d", SCENE);
        let xml = mod_dir.write("t.xml", &vehicle("t.i3d", "0>1"));

        let mut log = quiet_log();
        let mut outcome = BatchOutcome::default();
        let jobs = discover(&[xml.clone()], &mut log, &mut outcome);
        let groups = plan(jobs, &mut log, &mut outcome);
        let ctx = MapContext::new(&MapperConfig::default(), true);
        let result = process_group(&groups[0], &ctx);

        assert_eq!(result.succeeded, 1);
        assert_eq!(std::fs::read_to_string(scene).unwrap(), SCENE);
        assert_eq!(
            std::fs::read_to_string(xml).unwrap(),
            vehicle("t.i3d", "0>1")
        );
    }

    #[test]
    fn test_broken_scene_fails_whole_group() {
        let mod_dir = ModDir::new();
        mod_dir.write("t.i3d", "<i3D><Scene></i3D>");
        let a = mod_dir.write("a.xml", &vehicle("t.i3d", "0>"));
        let b = mod_dir.write("b.xml", &vehicle("t.i3d", "0>"));

        let mut log = quiet_log();
        let mut outcome = BatchOutcome::default();
        let jobs = discover(&[a, b], &mut log, &mut outcome);
        let groups = plan(jobs, &mut log, &mut outcome);
        let ctx = MapContext::new(&MapperConfig::default(), false);
        let result = process_group(&groups[0], &ctx);
        assert_eq!((result.succeeded, result.failed), (0, 2));
    }

    #[test]
    fn test_manifest_discovery() {
        let mod_dir = ModDir::new();
        let manifest = mod_dir.write(
            "modDesc.xml",
            "<modDesc><storeItems><storeItem xmlFilename=\"v/t.xml\"/><storeItem xmlFilename=\"v/gone.xml\"/></storeItems></modDesc>",
        );
        mod_dir.write("v/t.xml", &vehicle("t.i3d", "0>"));

        let mut log = quiet_log();
        let mut outcome = BatchOutcome::default();
        let jobs = discover(&[manifest], &mut log, &mut outcome);
        assert_eq!(jobs.len(), 1);
        assert!(jobs[0].vehicle.ends_with("v/t.xml"));
        assert_eq!(outcome.failed, 1);
    }
}
