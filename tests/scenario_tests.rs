//! End-to-end scenarios through the glyphgrid facade: config, font list and
//! compositor working together.

mod common;

use std::time::Instant;

use common::{MockFace, grid, render_context, test_config};
use glyphgrid::config::Config;
use glyphgrid::fonts::FontStyle;
use glyphgrid::render::{CellFlags, GridSnapshot, Layer, RenderContext, VisualKind};
use tempfile::TempDir;

fn constraint_width(kind: &VisualKind) -> Option<u8> {
    match kind {
        VisualKind::Glyph {
            constraint_width, ..
        } => Some(*constraint_width),
        VisualKind::Shortcut { .. } => None,
    }
}

#[test]
fn test_config_file_drives_cell_geometry_and_cursor() {
    let temp_dir = TempDir::new().expect("temp dir");
    let path = temp_dir.path().join("config.yaml");
    std::fs::write(
        &path,
        "font:\n  size: 20.0\ncursor:\n  style: bar\n  bar_width: 3.0\n",
    )
    .expect("write config");

    let config = Config::load(&path).expect("config loads");
    let mut ctx = render_context(config, Vec::new());
    let m = ctx.cell_metrics();
    assert_eq!((m.cell_width, m.cell_height), (12.0, 20.0));

    // from_lines leaves the default visible cursor at (0, 0)
    let snapshot = GridSnapshot::from_lines(&["ab"], 4);
    let frame = ctx.compose(&snapshot, Instant::now());
    let cursor = frame.instances.layer(Layer::Cursor);
    assert_eq!(cursor.len(), 1, "bar cursor is a single rect");
    assert_eq!(cursor[0].size, [3.0, 20.0]);
    assert_eq!(cursor[0].position, [0.0, 0.0]);
}

#[test]
fn test_only_third_font_covers_cjk() {
    let mut ctx = render_context(
        test_config(),
        vec![
            ("Noto Sans Symbols 2", MockFace::narrow("★")),
            ("Noto Sans CJK JP", MockFace::wide("蟹")),
        ],
    );
    let frame = ctx.compose(&grid(&["蟹"], 4), Instant::now());

    assert_eq!(frame.visuals.len(), 1);
    assert_eq!(frame.visuals[0].font_index(), Some(2));
    assert_eq!(frame.visuals[0].span, 2);
    assert!(ctx.atlas(1).is_none(), "the symbol font was never drawn with");
    assert!(ctx.atlas(2).is_some());
}

#[test]
fn test_font_picks_are_cached_across_frames() {
    let mut ctx = render_context(test_config(), vec![("Noto Sans CJK JP", MockFace::wide("蟹"))]);
    let snapshot = grid(&["ab蟹", "ba"], 6);

    ctx.compose(&snapshot, Instant::now());
    let first = ctx.fonts().pick_stats();
    ctx.compose(&snapshot, Instant::now());
    let second = ctx.fonts().pick_stats();

    assert_eq!(second.misses, first.misses, "no new coverage searches");
    assert_eq!(second.coverage_checks, first.coverage_checks);
    assert!(second.hits > first.hits);
}

#[test]
fn test_combining_mark_joins_its_base_cell() {
    let mut ctx = render_context(test_config(), Vec::new());
    let frame = ctx.compose(&grid(&["e\u{0301}x"], 4), Instant::now());

    assert_eq!(frame.visuals.len(), 2);
    assert_eq!(frame.visuals[0].text, "e\u{0301}");
    assert_eq!((frame.visuals[0].col, frame.visuals[0].last_col), (0, 0));
    assert_eq!(frame.visuals[1].col, 1);
    assert_eq!(frame.instances.glyphs_for(0).len(), 2);
}

#[test]
fn test_bold_cells_use_the_styled_variant() {
    let mut fonts = common::font_list(Vec::new());
    let bold = fonts.push_styled(FontStyle::Bold, "JetBrains Mono Bold", MockFace::narrow("a"));
    let mut ctx = RenderContext::new(test_config(), fonts, 1.0).expect("context");

    let mut snapshot = grid(&["ab"], 4);
    snapshot.insert_flags(0, 0..2, CellFlags::BOLD);
    let frame = ctx.compose(&snapshot, Instant::now());

    let indices: Vec<Option<usize>> = frame.visuals.iter().map(|v| v.font_index()).collect();
    // The variant covers 'a' only; 'b' stays on the primary font
    assert_eq!(indices, vec![Some(bold), Some(0)]);
    assert_eq!(frame.instances.glyphs_for(bold).len(), 1);
}

#[test]
fn test_nerd_icon_before_blank_spans_two_cells() {
    let mut ctx = render_context(
        test_config(),
        vec![("Symbols Nerd Font Mono", MockFace::narrow("\u{F115}"))],
    );
    let frame = ctx.compose(&grid(&["\u{F115} x", "xx\u{F115}"], 3), Instant::now());

    let icons: Vec<(usize, Option<u8>)> = frame
        .visuals
        .iter()
        .filter(|v| v.text == "\u{F115}")
        .map(|v| (v.row, constraint_width(&v.kind)))
        .collect();
    // Second row: the icon sits in the last column and stays narrow
    assert_eq!(icons, vec![(0, Some(2)), (1, Some(1))]);
    assert_eq!(frame.visuals.iter().filter(|v| v.font_index() == Some(1)).count(), 2);
}

#[test]
fn test_scale_factor_change_rebuilds_atlases() {
    let mut ctx = render_context(test_config(), Vec::new());
    let snapshot = grid(&["ab"], 4);
    ctx.compose(&snapshot, Instant::now());
    let before = ctx.atlas(0).map(|a| a.generation);

    ctx.set_scale_factor(2.0);
    let frame = ctx.compose(&snapshot, Instant::now());
    let m = ctx.cell_metrics();

    assert_eq!((m.cell_width, m.cell_height), (24.0, 40.0));
    assert_eq!(frame.summary.atlas_rebuilds, 1);
    assert_eq!(ctx.atlas(0).map(|a| a.generation), before.map(|g| g + 1));
    assert_eq!(frame.instances.glyphs_for(0)[1].position[0], 24.0);
}

#[test]
fn test_box_drawing_never_touches_an_atlas() {
    let mut ctx = render_context(test_config(), Vec::new());
    let frame = ctx.compose(&grid(&["┌─┐", "└─┘"], 3), Instant::now());

    assert_eq!(frame.visuals.len(), 6);
    assert!(
        frame
            .visuals
            .iter()
            .all(|v| matches!(v.kind, VisualKind::Shortcut { .. }))
    );
    assert!(!frame.instances.layer(Layer::Shortcut).is_empty());
    assert_eq!(frame.instances.glyph_count(), 0);
    assert!(ctx.atlas(0).is_none());
}
