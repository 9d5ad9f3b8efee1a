//! Overlay style: colors, sizes, hint text and the scan-indicator variant.
//!
//! [`StyleConfig`] is always fully defaulted. Callers change it through a
//! sparse [`StyleOptions`] set; every option is validated on its own and a
//! bad value is reported as a [`ValidationIssue`] while the previous value
//! stays in place.

use std::fmt::Display;

use serde::Deserialize;

use crate::types::{argb, Argb};

/// Largest accepted pixel size for any length option.
pub const MAX_EXTENT: i32 = 8192;
/// Largest accepted grid column count.
pub const MAX_GRID_COLUMNS: i32 = 4096;

/// Which scan indicator sweeps across the frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LaserStyle {
    /// A soft glowing band.
    #[default]
    Line,
    /// A fading grid trail.
    Grid,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StyleConfig {
    pub mask_color: Argb,
    pub laser_color: Argb,
    pub point_color: Argb,
    pub point_border_color: Argb,
    pub hint_text: String,
    pub hint_text_color: Argb,
    /// Glyph height in pixels.
    pub hint_text_size: i32,
    pub laser_style: LaserStyle,
    pub full_screen: bool,
    pub grid_columns: i32,
    /// 0 means "use the frame height".
    pub grid_height: i32,
    pub show_result_point: bool,
    pub result_point_radius: f32,
    pub result_point_corner_radius: f32,
    pub result_point_stroke_width: f32,
    pub margin: i32,
    pub laser_thickness: i32,
    pub corner_thickness: i32,
    pub corner_length: i32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            mask_color: 0x6000_0000,
            laser_color: 0xFF22_CE6B,
            point_color: 0xFF22_CE6B,
            point_border_color: 0xFFFF_FFFF,
            hint_text: "Place the code inside the frame to scan".to_string(),
            hint_text_color: 0xFFFF_FFFF,
            hint_text_size: 14,
            laser_style: LaserStyle::Line,
            full_screen: false,
            grid_columns: 24,
            grid_height: 0,
            show_result_point: true,
            result_point_radius: 20.0,
            result_point_corner_radius: 20.0,
            result_point_stroke_width: 6.0,
            margin: 4,
            laser_thickness: 3,
            corner_thickness: 2,
            corner_length: 14,
        }
    }
}

/// Sparse set of style changes. Absent fields leave the current value alone.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StyleOptions {
    pub mask_color: Option<String>,
    pub laser_color: Option<String>,
    pub point_color: Option<String>,
    pub point_border_color: Option<String>,
    pub hint_text: Option<String>,
    pub hint_text_color: Option<String>,
    pub hint_text_size: Option<i32>,
    pub laser_style: Option<LaserStyle>,
    pub full_screen: Option<bool>,
    pub grid_columns: Option<i32>,
    pub grid_height: Option<i32>,
    pub show_result_point: Option<bool>,
    pub result_point_radius: Option<f32>,
    pub result_point_corner_radius: Option<f32>,
    pub result_point_stroke_width: Option<f32>,
    pub margin: Option<i32>,
    pub laser_thickness: Option<i32>,
    pub corner_thickness: Option<i32>,
    pub corner_length: Option<i32>,
}

/// An option that was rejected; the field kept its previous value.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    #[error("{field}: '{value}' is not a valid color")]
    InvalidColor { field: &'static str, value: String },

    #[error("{field}: {value} must be greater than zero")]
    NotPositive { field: &'static str, value: String },

    #[error("{field}: {value} must not be negative")]
    Negative { field: &'static str, value: String },

    #[error("{field}: {value} exceeds the maximum of {max}")]
    TooLarge { field: &'static str, value: String, max: String },
}

impl ValidationIssue {
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidColor { field, .. }
            | Self::NotPositive { field, .. }
            | Self::Negative { field, .. }
            | Self::TooLarge { field, .. } => *field,
        }
    }
}

/// Result of merging options into a config.
#[derive(Debug)]
pub struct Merge {
    pub config: StyleConfig,
    pub rejected: Vec<ValidationIssue>,
}

impl StyleConfig {
    /// Pure merge: returns the new config plus every rejected field.
    pub fn merged(&self, options: &StyleOptions) -> Merge {
        let mut next = self.clone();
        let mut rejected = Vec::new();
        let r = &mut rejected;

        take_color("mask_color", &options.mask_color, &mut next.mask_color, r);
        take_color("laser_color", &options.laser_color, &mut next.laser_color, r);
        take_color("point_color", &options.point_color, &mut next.point_color, r);
        take_color("point_border_color", &options.point_border_color, &mut next.point_border_color, r);
        take_color("hint_text_color", &options.hint_text_color, &mut next.hint_text_color, r);

        // Empty hint text is an explicit "no hint".
        if let Some(text) = &options.hint_text {
            next.hint_text = text.clone();
        }

        let extent = MAX_EXTENT as f32;
        take_positive("hint_text_size", options.hint_text_size, MAX_EXTENT, &mut next.hint_text_size, r);
        take_positive("grid_columns", options.grid_columns, MAX_GRID_COLUMNS, &mut next.grid_columns, r);
        take_non_negative("grid_height", options.grid_height, MAX_EXTENT, &mut next.grid_height, r);

        take_positive("result_point_radius", options.result_point_radius, extent, &mut next.result_point_radius, r);
        take_non_negative(
            "result_point_corner_radius",
            options.result_point_corner_radius,
            extent,
            &mut next.result_point_corner_radius,
            r,
        );
        take_non_negative(
            "result_point_stroke_width",
            options.result_point_stroke_width,
            extent,
            &mut next.result_point_stroke_width,
            r,
        );

        take_non_negative("margin", options.margin, MAX_EXTENT, &mut next.margin, r);
        take_positive("laser_thickness", options.laser_thickness, MAX_EXTENT, &mut next.laser_thickness, r);
        take_positive("corner_thickness", options.corner_thickness, MAX_EXTENT, &mut next.corner_thickness, r);
        take_positive("corner_length", options.corner_length, MAX_EXTENT, &mut next.corner_length, r);

        if let Some(style) = options.laser_style {
            next.laser_style = style;
        }
        if let Some(full) = options.full_screen {
            next.full_screen = full;
        }
        if let Some(show) = options.show_result_point {
            next.show_result_point = show;
        }

        Merge { config: next, rejected }
    }

    /// Merge in place. The returned issues may be ignored.
    pub fn apply(&mut self, options: &StyleOptions) -> Vec<ValidationIssue> {
        let Merge { config, rejected } = self.merged(options);
        *self = config;
        rejected
    }
}

fn take_color(field: &'static str, value: &Option<String>, slot: &mut Argb, rejected: &mut Vec<ValidationIssue>) {
    let Some(text) = value else { return };
    if text.trim().is_empty() {
        return;
    }
    match parse_color(text) {
        Some(c) => *slot = c,
        None => rejected.push(ValidationIssue::InvalidColor { field, value: text.clone() }),
    }
}

fn take_positive<T>(field: &'static str, value: Option<T>, max: T, slot: &mut T, rejected: &mut Vec<ValidationIssue>)
where
    T: PartialOrd + Default + Copy + Display,
{
    let Some(v) = value else { return };
    // NaN fails the comparison and is rejected.
    if v > T::default() {
        store_capped(field, v, max, slot, rejected);
    } else {
        rejected.push(ValidationIssue::NotPositive { field, value: v.to_string() });
    }
}

fn take_non_negative<T>(field: &'static str, value: Option<T>, max: T, slot: &mut T, rejected: &mut Vec<ValidationIssue>)
where
    T: PartialOrd + Default + Copy + Display,
{
    let Some(v) = value else { return };
    if v >= T::default() {
        store_capped(field, v, max, slot, rejected);
    } else {
        rejected.push(ValidationIssue::Negative { field, value: v.to_string() });
    }
}

fn store_capped<T>(field: &'static str, v: T, max: T, slot: &mut T, rejected: &mut Vec<ValidationIssue>)
where
    T: PartialOrd + Copy + Display,
{
    if v > max {
        rejected.push(ValidationIssue::TooLarge { field, value: v.to_string(), max: max.to_string() });
    } else {
        *slot = v;
    }
}

/// Parse `#RRGGBB`, `#AARRGGBB` or a basic color name.
pub fn parse_color(text: &str) -> Option<Argb> {
    let text = text.trim();
    if let Some(digits) = text.strip_prefix('#') {
        let bytes = hex::decode(digits).ok()?;
        return match bytes.as_slice() {
            [r, g, b] => Some(argb(0xFF, *r, *g, *b)),
            [a, r, g, b] => Some(argb(*a, *r, *g, *b)),
            _ => None,
        };
    }
    named_color(&text.to_ascii_lowercase())
}

fn named_color(name: &str) -> Option<Argb> {
    let c = match name {
        "black" => 0xFF00_0000,
        "darkgray" | "darkgrey" => 0xFF44_4444,
        "gray" | "grey" => 0xFF88_8888,
        "lightgray" | "lightgrey" => 0xFFCC_CCCC,
        "white" => 0xFFFF_FFFF,
        "red" => 0xFFFF_0000,
        "green" => 0xFF00_FF00,
        "blue" => 0xFF00_00FF,
        "yellow" => 0xFFFF_FF00,
        "cyan" | "aqua" => 0xFF00_FFFF,
        "magenta" | "fuchsia" => 0xFFFF_00FF,
        "lime" => 0xFF00_FF00,
        "maroon" => 0xFF80_0000,
        "navy" => 0xFF00_0080,
        "olive" => 0xFF80_8000,
        "purple" => 0xFF80_0080,
        "silver" => 0xFFC0_C0C0,
        "teal" => 0xFF00_8080,
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("#3366CC", Some(0xFF3366CC))]
    #[case("#803366cc", Some(0x803366CC))]
    #[case("  #000000 ", Some(0xFF000000))]
    #[case("Teal", Some(0xFF008080))]
    #[case("grey", Some(0xFF888888))]
    #[case("#12345", None)]
    #[case("#GGHHII", None)]
    #[case("#1234", None)]
    #[case("3366CC", None)]
    #[case("chartreuse", None)]
    fn color_parsing(#[case] text: &str, #[case] expected: Option<Argb>) {
        assert_eq!(parse_color(text), expected);
    }

    #[test]
    fn defaults_are_usable() {
        let cfg = StyleConfig::default();
        assert!(!cfg.hint_text.is_empty());
        assert!(cfg.grid_columns > 0);
        assert!(cfg.corner_length > 0 && cfg.corner_thickness > 0 && cfg.laser_thickness > 0);
        assert_ne!(cfg.mask_color >> 24, 0);
    }

    #[test]
    fn invalid_color_keeps_previous_value() {
        let mut cfg = StyleConfig::default();
        let before = cfg.laser_color;
        let rejected = cfg.apply(&StyleOptions { laser_color: Some("#zzzzzz".into()), ..Default::default() });
        assert_eq!(cfg.laser_color, before);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].field(), "laser_color");

        // Applying the same invalid value again changes nothing.
        let again = cfg.clone();
        cfg.apply(&StyleOptions { laser_color: Some("#zzzzzz".into()), ..Default::default() });
        assert_eq!(cfg, again);
    }

    #[test]
    fn valid_color_changes_once() {
        let mut cfg = StyleConfig::default();
        let opts = StyleOptions { laser_color: Some("#3366CC".into()), ..Default::default() };
        assert!(cfg.apply(&opts).is_empty());
        assert_eq!(cfg.laser_color, 0xFF3366CC);
        let snapshot = cfg.clone();
        cfg.apply(&opts);
        assert_eq!(cfg, snapshot);
    }

    #[test]
    fn empty_color_string_is_ignored_silently() {
        let mut cfg = StyleConfig::default();
        let rejected = cfg.apply(&StyleOptions { mask_color: Some(String::new()), ..Default::default() });
        assert!(rejected.is_empty());
        assert_eq!(cfg.mask_color, StyleConfig::default().mask_color);
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    fn non_positive_grid_columns_rejected(#[case] columns: i32) {
        let mut cfg = StyleConfig::default();
        cfg.apply(&StyleOptions { grid_columns: Some(6), ..Default::default() });
        let rejected = cfg.apply(&StyleOptions { grid_columns: Some(columns), ..Default::default() });
        assert_eq!(cfg.grid_columns, 6);
        assert_eq!(
            rejected,
            vec![ValidationIssue::NotPositive { field: "grid_columns", value: columns.to_string() }]
        );
    }

    #[test]
    fn grid_height_accepts_zero_rejects_negative() {
        let mut cfg = StyleConfig::default();
        cfg.apply(&StyleOptions { grid_height: Some(80), ..Default::default() });
        assert_eq!(cfg.grid_height, 80);
        assert!(cfg.apply(&StyleOptions { grid_height: Some(0), ..Default::default() }).is_empty());
        assert_eq!(cfg.grid_height, 0);
        let rejected = cfg.apply(&StyleOptions { grid_height: Some(-1), ..Default::default() });
        assert_eq!(rejected[0].field(), "grid_height");
        assert_eq!(cfg.grid_height, 0);
    }

    #[test]
    fn empty_hint_text_is_explicit() {
        let mut cfg = StyleConfig::default();
        cfg.apply(&StyleOptions { hint_text: Some(String::new()), ..Default::default() });
        assert!(cfg.hint_text.is_empty());
        cfg.apply(&StyleOptions::default());
        assert!(cfg.hint_text.is_empty());
    }

    #[test]
    fn merged_reports_every_rejection_without_mutating() {
        let cfg = StyleConfig::default();
        let opts = StyleOptions {
            mask_color: Some("nope".into()),
            hint_text_size: Some(0),
            result_point_radius: Some(f32::NAN),
            margin: Some(-2),
            laser_style: Some(LaserStyle::Grid),
            ..Default::default()
        };
        let merge = cfg.merged(&opts);
        let fields: Vec<_> = merge.rejected.iter().map(ValidationIssue::field).collect();
        assert_eq!(fields, ["mask_color", "hint_text_size", "result_point_radius", "margin"]);
        assert_eq!(merge.config.laser_style, LaserStyle::Grid);
        assert_eq!(merge.config.margin, cfg.margin);
        assert_eq!(cfg, StyleConfig::default());
    }

    #[rstest]
    #[case::margin(StyleOptions { margin: Some(i32::MAX), ..Default::default() }, "margin")]
    #[case::corner_length(StyleOptions { corner_length: Some(i32::MAX), ..Default::default() }, "corner_length")]
    #[case::hint_text_size(StyleOptions { hint_text_size: Some(100_000_000), ..Default::default() }, "hint_text_size")]
    #[case::grid_columns(StyleOptions { grid_columns: Some(200_000_000), ..Default::default() }, "grid_columns")]
    #[case::grid_height(StyleOptions { grid_height: Some(MAX_EXTENT + 1), ..Default::default() }, "grid_height")]
    #[case::point_radius(StyleOptions { result_point_radius: Some(f32::INFINITY), ..Default::default() }, "result_point_radius")]
    fn oversized_values_are_rejected(#[case] opts: StyleOptions, #[case] field: &str) {
        let mut cfg = StyleConfig::default();
        let rejected = cfg.apply(&opts);
        assert_eq!(rejected.len(), 1);
        assert!(matches!(&rejected[0], ValidationIssue::TooLarge { field: f, .. } if *f == field));
        assert_eq!(cfg, StyleConfig::default());
    }

    #[test]
    fn limits_themselves_are_accepted() {
        let mut cfg = StyleConfig::default();
        let rejected = cfg.apply(&StyleOptions {
            margin: Some(MAX_EXTENT),
            grid_columns: Some(MAX_GRID_COLUMNS),
            result_point_stroke_width: Some(MAX_EXTENT as f32),
            ..Default::default()
        });
        assert!(rejected.is_empty());
        assert_eq!(cfg.margin, MAX_EXTENT);
        assert_eq!(cfg.grid_columns, MAX_GRID_COLUMNS);
    }

    #[test]
    fn options_deserialize_from_sparse_json() {
        let opts: StyleOptions = serde_json::from_str(
            r##"{"laser_color": "#FF0000", "laser_style": "grid", "grid_columns": 4, "unknown": 1}"##,
        )
        .expect("failed to parse options");
        assert_eq!(opts.laser_style, Some(LaserStyle::Grid));
        assert_eq!(opts.grid_columns, Some(4));
        assert!(opts.mask_color.is_none());
    }
}
