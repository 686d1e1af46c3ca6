//! Command-line interface for glyphgrid.
//!
//! A headless front end over the rendering core: list the resolved font
//! fallback list, or compose one frame from a piece of text and report what
//! the compositor produced.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glyphgrid_config::Config;
use glyphgrid_fonts::{FontManager, FontRole};
use glyphgrid_render::{GridSnapshot, Layer, RenderContext};

use crate::debug::DebugLevel;

/// glyphgrid - font fallback, glyph atlas and cell compositor core
#[derive(Parser, Debug)]
#[command(name = "glyphgrid")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log filter: off, error, warn, info, debug or trace (overrides GLYPHGRID_LOG)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<DebugLevel>,

    /// Append log lines to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Configuration file (default: the platform config directory)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the loaded fonts with their classification
    Fonts,
    /// Compose one frame from text and print instance counts
    Render {
        /// Text to lay out; newlines start a new row
        #[arg(long)]
        text: String,

        /// Grid width in cells
        #[arg(long, default_value_t = 80)]
        cols: usize,

        /// Device scale factor
        #[arg(long, default_value_t = 1.0)]
        scale: f32,
    },
}

/// Load the configuration named on the command line, or the default one.
pub fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let path = path.cloned().unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config in {}", path.display()))?;
    Ok(config)
}

/// Run a parsed command line and return the report to print.
pub fn run(cli: &Cli) -> Result<String> {
    let config = load_config(cli.config.as_ref())?;
    match &cli.command {
        Commands::Fonts => {
            let fonts = FontManager::from_config(&config).context("failed to load fonts")?;
            Ok(format_font_list(&fonts))
        }
        Commands::Render { text, cols, scale } => {
            let mut ctx = RenderContext::from_config(config, *scale)
                .context("failed to create render context")?;
            Ok(render_report(&mut ctx, text, *cols))
        }
    }
}

/// One line per font: index, role, label and classification.
pub fn format_font_list(fonts: &FontManager) -> String {
    let mut out = String::new();
    for (index, entry) in fonts.entries().iter().enumerate() {
        let role = match entry.role {
            FontRole::Primary => "primary".to_string(),
            FontRole::Fallback => "fallback".to_string(),
            FontRole::Styled(style) => format!("{style:?}").to_lowercase(),
        };
        let class = entry.class;
        let _ = writeln!(
            out,
            "{index:>3}  {role:<10} {label}  symbol={symbol} nerd={nerd} emoji={emoji} span={span} scale={scale:.2}",
            label = entry.label,
            symbol = class.symbol,
            nerd = class.nerd_symbol,
            emoji = class.color_emoji,
            span = class.max_cell_span,
            scale = class.scale_override,
        );
    }
    out
}

/// Lay `text` out on a grid `cols` wide, compose one frame and describe it.
pub fn render_report(ctx: &mut RenderContext, text: &str, cols: usize) -> String {
    let cols = cols.max(1);
    let lines: Vec<&str> = text.split('\n').collect();
    let snapshot = GridSnapshot::from_lines(&lines, cols);
    let frame = ctx.compose(&snapshot, Instant::now());
    let metrics = ctx.cell_metrics();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "grid {}x{}  cell {}x{} px  baseline {}",
        cols,
        lines.len(),
        metrics.cell_width,
        metrics.cell_height,
        metrics.baseline
    );
    let _ = writeln!(out, "clusters {}", frame.summary.clusters);
    for layer in Layer::ALL {
        let count = frame.instances.layer(layer).len();
        if count > 0 {
            let _ = writeln!(out, "{:<12} {count}", format!("{layer:?}").to_lowercase());
        }
    }
    for font_index in 0..ctx.fonts().font_count() {
        let glyphs = frame.instances.glyphs_for(font_index).len();
        let Some(atlas) = ctx.atlas(font_index) else {
            continue;
        };
        let label = ctx
            .fonts()
            .entry(font_index)
            .map(|e| e.label.as_str())
            .unwrap_or("?");
        let _ = writeln!(
            out,
            "font {font_index} ({label}): {glyphs} glyphs, atlas {}x{} {:?} gen {}{}",
            atlas.width,
            atlas.height,
            atlas.format,
            atlas.generation,
            if atlas.dropped > 0 {
                format!(", {} dropped", atlas.dropped)
            } else {
                String::new()
            }
        );
    }
    out
}
