use anyhow::Result;
use clap::Parser;
use glyphgrid::cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI --log-level takes precedence over GLYPHGRID_LOG
    glyphgrid::debug::init_log_bridge(cli.log_level, cli.log_file.as_deref());
    log::info!("Starting glyphgrid {}", glyphgrid::VERSION);

    match cli::run(&cli) {
        Ok(report) => {
            print!("{report}");
            Ok(())
        }
        Err(e) => {
            eprintln!("glyphgrid: error: {e:#}");
            std::process::exit(1);
        }
    }
}
