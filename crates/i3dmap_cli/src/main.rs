mod cli_args;
mod commands;
mod config;
mod logfile;
mod manifest;
mod paths;
mod process;
mod util;

use clap::{Parser, Subcommand};
use config::MapperConfig;
use i3dmap_error::Result;
use log::{debug, error, info};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Give every node of a GIANTS vehicle mod a stable i3dMapping id.
///
/// Run with vehicle XML files or modDesc.xml manifests (drag and drop onto
/// the executable works too); subcommands inspect scene files.
#[derive(Parser)]
#[command(name = "i3dmap", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    map: cli_args::MapArgs,

    /// Enable verbose logging (can be used multiple times: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode: suppress explanatory output, show only raw results
    #[arg(short = 'q', long = "quiet", global = true)]
    quiet: bool,

    /// JSON file overriding the built-in attribute and tag lists
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Do not write the log file at the mod root
    #[arg(long, global = true)]
    no_log_file: bool,

    /// Number of worker threads (defaults to all cores)
    #[arg(long, global = true, value_name = "N")]
    jobs: Option<NonZeroUsize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve duplicate names and rewrite positional node references
    Map {
        #[command(flatten)]
        args: cli_args::MapArgs,
    },
    /// Print the node tree of a scene file with addresses and resolved names
    Tree {
        #[command(flatten)]
        scene: cli_args::SceneArgs,
        #[command(flatten)]
        format: cli_args::TreeFormatArgs,
    },
    /// Show the node a positional address points at
    Lookup {
        #[command(flatten)]
        scene: cli_args::SceneArgs,
        /// Address such as 0>0|1|2
        #[arg(index = 2)]
        address: String,
    },
}

fn main() {
    if let Err(e) = run_main() {
        error!("{}", e.user_message());
        debug!("{}", e.debug_message());
        std::process::exit(1);
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => log::LevelFilter::Warn,  // Default: only warnings and errors
        1 => log::LevelFilter::Info,  // -v: info level
        2 => log::LevelFilter::Debug, // -vv: debug level
        _ => log::LevelFilter::Trace, // -vvv+: trace level (everything)
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .format(|buf, record| {
            use std::io::Write;
            let level_style = match record.level() {
                log::Level::Error => "\x1b[31mERROR\x1b[0m", // Red
                log::Level::Warn => "\x1b[33mWARN\x1b[0m",   // Yellow
                log::Level::Info => "\x1b[32mINFO\x1b[0m",   // Green
                log::Level::Debug => "\x1b[36mDEBUG\x1b[0m", // Cyan
                log::Level::Trace => "\x1b[35mTRACE\x1b[0m", // Magenta
            };

            writeln!(buf, "[{}] {}", level_style, record.args())
        })
        .init();
}

fn run_main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    info!("i3dmap starting with verbosity level: {}", cli.verbose);

    let config = MapperConfig::load(cli.config.as_deref())?;
    let output = util::OutputHandler::new(cli.quiet);
    let ctx = commands::CommandContext {
        config: &config,
        output: &output,
        verbose: cli.verbose,
        write_log_file: !cli.no_log_file,
        jobs: cli.jobs,
    };

    match cli.command {
        None => commands::cmd_map(cli.map, &ctx),
        Some(Commands::Map { args }) => commands::cmd_map(args, &ctx),
        Some(Commands::Tree { scene, format }) => commands::cmd_tree(scene, format, &ctx),
        Some(Commands::Lookup { scene, address }) => commands::cmd_lookup(scene, address, &ctx),
    }
}
