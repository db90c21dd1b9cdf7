use crate::bootstrap::App;
use crate::demo::demo_module;
use crate::middleware::TracingMiddleware;
use crate::runtime_config::RuntimeConfig;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

/// Command-line interface for the trellis demo application.
#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Trellis route composition engine CLI", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Serve the built-in demo application
    Serve {
        /// Port to bind
        #[arg(short, long, default_value_t = 3000, env = "TRELLIS_PORT")]
        port: u16,

        /// Host address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },
    /// Print the demo application's compiled route table
    Routes,
}

/// Execute the CLI command provided by the user.
///
/// # Errors
///
/// Returns an error if the server fails to bind or exits abnormally.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { port, host } => {
            let config = RuntimeConfig::from_env();
            may::config().set_stack_size(config.stack_size);
            info!(
                stack_size = config.stack_size,
                "Coroutine runtime configured"
            );

            let mut app = App::build(&demo_module());
            app.add_middleware(Arc::new(TracingMiddleware));
            app.enable_metrics();

            let handle = app.listen_on((host.as_str(), port), |addr| {
                println!("listening on http://{addr}");
            })?;
            handle
                .join()
                .map_err(|e| anyhow::anyhow!("server exited abnormally: {e:?}"))
        }
        Commands::Routes => {
            App::build(&demo_module()).routes().dump_routes();
            Ok(())
        }
    }
}
