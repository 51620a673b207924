use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "lambdeploy",
    about = "lambdeploy: deploy applications onto a function platform",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Path to lambdeploy.toml
    #[arg(short, long, global = true, default_value = "lambdeploy.toml")]
    config: PathBuf,
    /// Application name (overrides [app].name)
    #[arg(short, long, global = true)]
    app: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy a build: ensure the role, publish layers, create or update
    /// the function, and publish a new version.
    Deploy {
        /// Unique identifier of this build
        #[arg(long)]
        build_id: String,
        /// Runtime identifier, e.g. ruby2.5
        #[arg(long)]
        runtime: String,
        /// Application package
        #[arg(long)]
        app_zip: PathBuf,
        /// Bootstrap layer archive
        #[arg(long)]
        pre_zip: PathBuf,
        /// Library layer archive
        #[arg(long)]
        lib_zip: PathBuf,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Read or write configuration variables
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Print the application's logs, oldest stream first
    Logs {
        #[command(subcommand)]
        action: Option<LogsAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Set a variable and publish a new version
    Set { name: String, value: String },
    /// Print a variable's value
    Get { name: String },
}

#[derive(Subcommand)]
enum LogsAction {
    /// Append lines to a log stream of the local cloud
    Emit {
        #[arg(short, long, default_value = "local")]
        stream: String,
        #[arg(required = true)]
        messages: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lambdeploy=info".parse()?)
        )
        .init();

    let cli = Cli::parse();
    let ctx = commands::Context::load(&cli.config, cli.app.as_deref())?;

    match cli.command {
        Commands::Deploy {
            build_id,
            runtime,
            app_zip,
            pre_zip,
            lib_zip,
            format,
        } => {
            let build = lambdeploy_core::BuildInfo {
                runtime,
                build_id,
                app_zip,
                pre_zip,
                lib_zip,
            };
            commands::deploy::deploy(&ctx, &build, &format)
        }
        Commands::Config { action } => match action {
            ConfigAction::Set { name, value } => commands::config::set(&ctx, &name, &value),
            ConfigAction::Get { name } => commands::config::get(&ctx, &name),
        },
        Commands::Logs { action } => match action {
            None => commands::logs::show(&ctx),
            Some(LogsAction::Emit { stream, messages }) => {
                commands::logs::emit(&ctx, &stream, &messages)
            }
        },
    }
}
