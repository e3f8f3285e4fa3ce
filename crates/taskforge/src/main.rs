mod engine;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::error;

use taskforge_core::{EnvIgnore, Error, Lifecycle, Manager, Result, RunConfig, StaticAddonSource};

use status_report::{ADDON_NAME, StatusReportFactory};

/// Taskforge: a phased task-graph builder
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Path to a TOML run configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log generation-time addon failures and continue instead of aborting
    #[arg(long)]
    lenient: bool,

    /// Prefix applied to every generated task name
    #[arg(long)]
    task_prefix: Option<String>,

    /// Skip an addon entirely (repeatable)
    #[arg(long = "disable-addon", value_name = "NAME")]
    disable_addons: Vec<String>,

    /// Tell every addon to skip environment-prefix-based defaults
    #[arg(long)]
    ignore_env: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve and run the task graph up to and including a hook
    Run {
        /// The hook to run (e.g. "build")
        #[arg(default_value = "build")]
        task: String,

        /// Extra arguments passed through to the execution engine
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List constructed addons and the generator map
    List,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = CliArgs::parse();

    match run(args).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            error!("[forge] {err}");
            std::process::exit(1);
        }
    }
}

fn build_config(args: &CliArgs) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_toml_path(path)?,
        None => RunConfig::default(),
    };

    if args.lenient {
        config.strict = false;
    }
    if let Some(prefix) = &args.task_prefix {
        config.task_prefix = prefix.clone();
    }
    config.disable_addons.extend(args.disable_addons.iter().cloned());
    if args.ignore_env {
        config.ignore_env = EnvIgnore::All(true);
    }

    Ok(config)
}

async fn run(args: CliArgs) -> Result<i32> {
    let config = build_config(&args)?;

    let source = StaticAddonSource::new().with(ADDON_NAME, Arc::new(StatusReportFactory));
    let mut manager = Manager::new(config, Lifecycle::forge_default(), Box::new(source));
    manager.initialize();

    match args.command {
        Commands::List => {
            let registry = manager.registry().ok_or(Error::NotInitialized)?;
            println!("addons ({}):", registry.len());
            for (name, handle) in registry.iter() {
                let caps: Vec<String> =
                    handle.addon.capabilities().iter().map(|key| key.to_string()).collect();
                println!("  {}: {}", name, caps.join(", "));
            }

            let graph = manager.graph().ok_or(Error::NotInitialized)?;
            println!("generators ({}):", graph.len());
            for node in graph.nodes() {
                match &node.after {
                    Some(after) => println!("  {} (after {})", node.key, after),
                    None => println!("  {}", node.key),
                }
            }
            Ok(0)
        }
        Commands::Run { task, args: extra_args } => {
            manager.run(&engine::SequentialEngine, &task, &extra_args).await
        }
    }
}
