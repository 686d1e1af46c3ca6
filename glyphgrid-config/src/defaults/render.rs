//! Default values for atlas, compositor, cursor and overlay settings.

pub fn atlas_max_size() -> u32 {
    4096
}

pub fn atlas_padding() -> u32 {
    1
}

pub fn symbol_atlas_scale() -> f32 {
    1.0
}

pub fn cluster_merge_limit() -> usize {
    12
}

pub fn bold_is_bright() -> bool {
    true
}

pub fn faint_alpha() -> f32 {
    0.5
}

pub fn force_fit_tolerance() -> f32 {
    0.05 // Overflow beyond 5% of the claimed box forces shrink-to-fit
}

pub fn minimum_contrast() -> f32 {
    1.0 // Disabled by default (1.0 = no adjustment)
}

pub fn cursor_bar_width() -> f32 {
    2.0
}

pub fn cursor_underline_height() -> f32 {
    2.0
}

pub fn resize_indicator_ms() -> u64 {
    1000
}

pub fn sync_output_timeout_ms() -> u64 {
    150
}

pub fn scrollbar_width() -> f32 {
    8.0
}

pub fn scrollbar_min_thumb() -> f32 {
    20.0
}
