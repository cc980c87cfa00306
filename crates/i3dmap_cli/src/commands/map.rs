use crate::cli_args::MapArgs;
use crate::commands::CommandContext;
use crate::logfile::RunLog;
use crate::process::{self, BatchOutcome, MapContext};
use i3dmap_error::{I3dMapError, Result};
use log::{debug, info};

pub fn cmd_map(args: MapArgs, ctx: &CommandContext) -> Result<()> {
    if args.files.is_empty() {
        ctx.output
            .print_info("Drag and drop one or more XML files onto i3dmap.");
        ctx.output.print_info("Usage:");
        ctx.output
            .print_info("  i3dmap <vehicle.xml | modDesc.xml>...");
        return Ok(());
    }
    info!(
        "Mapping {} input(s){}",
        args.files.len(),
        if args.dry_run { " (dry run)" } else { "" }
    );

    let mut log = RunLog::new(
        &ctx.config.log_file_name,
        ctx.write_log_file,
        ctx.verbose > 0,
        *ctx.output,
    );
    let mut outcome = BatchOutcome::default();

    let jobs = process::discover(&args.files, &mut log, &mut outcome);
    let groups = process::plan(jobs, &mut log, &mut outcome);
    debug!("Planned {} scene group(s)", groups.len());

    let map_ctx = MapContext::new(ctx.config, args.dry_run);
    for result in process::run_groups(&groups, &map_ctx, ctx.jobs)? {
        outcome.absorb(result, &mut log);
    }

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&outcome.reports).map_err(|e| {
            I3dMapError::cli_execution_failed(format!("Cannot serialize report: {e}"))
        })?;
        std::fs::write(path, json).map_err(|e| I3dMapError::from(e).with_file_path(path))?;
        ctx.output
            .print_info_fmt(format_args!("Report written to {}", path.display()));
    }

    ctx.output.print_info_fmt(format_args!(
        "Processed {} pair(s): {} succeeded, {} failed, {} skipped",
        outcome.succeeded + outcome.failed,
        outcome.succeeded,
        outcome.failed,
        outcome.skipped
    ));
    if outcome.summary.anomalies() > 0 {
        ctx.output.print_info_fmt(format_args!(
            "{} reference(s) need manual attention, see the log",
            outcome.summary.anomalies()
        ));
    }
    if outcome.failed > 0 {
        return Err(I3dMapError::cli_execution_failed(format!(
            "{} document pair(s) failed",
            outcome.failed
        ))
        .with_command("map"));
    }
    Ok(())
}
