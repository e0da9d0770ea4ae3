// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxdock-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxdock and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Best-effort geometry normalization.
//!
//! Shifts all positioned elements so the diagram's bounding box starts near
//! the origin. This is a heuristic mitigation for diagrams saved far from
//! (0,0); it is not required for protocol correctness. Content that does not
//! scan as expected is returned unmodified rather than corrupted.

use regex::Regex;

/// Tolerance window: minimum coordinates inside `[0, ORIGIN_MARGIN]` are
/// considered near enough to the origin.
pub const ORIGIN_MARGIN: f64 = 40.0;

/// Outcome of a normalization pass, distinguishing the cases the UI reports.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizeOutcome {
    /// No geometry elements found; nothing to normalize.
    NoGeometry,
    /// Geometry elements exist but none carry numeric coordinates.
    NoPositionedCells,
    /// Minimum coordinates already fall inside the tolerance window.
    NearOrigin,
    /// Coordinates were shifted; `xml` is the rewritten document.
    Shifted {
        xml: String,
        shift_x: f64,
        shift_y: f64,
    },
}

fn geometry_tag_regex() -> Regex {
    Regex::new(r"<mxGeometry\b[^>]*>").expect("static geometry regex")
}

fn coordinate_attr_regex() -> Regex {
    Regex::new(r#"\b([xy])="([^"]*)""#).expect("static coordinate regex")
}

struct CoordinateScan {
    tags: usize,
    min_x: Option<f64>,
    min_y: Option<f64>,
}

fn scan_coordinates(xml: &str) -> CoordinateScan {
    let tag_re = geometry_tag_regex();
    let attr_re = coordinate_attr_regex();

    let mut scan = CoordinateScan {
        tags: 0,
        min_x: None,
        min_y: None,
    };

    for tag in tag_re.find_iter(xml) {
        scan.tags += 1;
        for capture in attr_re.captures_iter(tag.as_str()) {
            let Ok(value) = capture[2].parse::<f64>() else {
                continue;
            };
            let slot = match &capture[1] {
                "x" => &mut scan.min_x,
                _ => &mut scan.min_y,
            };
            *slot = Some(match *slot {
                Some(current) if current <= value => current,
                _ => value,
            });
        }
    }

    scan
}

/// Rewrites every numeric `x`/`y` coordinate inside `mxGeometry` tags,
/// subtracting the per-axis shift. Zero-shift axes are left untouched.
fn shift_coordinates(xml: &str, shift_x: f64, shift_y: f64) -> String {
    let tag_re = geometry_tag_regex();
    let attr_re = coordinate_attr_regex();

    tag_re
        .replace_all(xml, |tag: &regex::Captures<'_>| {
            attr_re
                .replace_all(&tag[0], |attr: &regex::Captures<'_>| {
                    let shift = if &attr[1] == "x" { shift_x } else { shift_y };
                    match attr[2].parse::<f64>() {
                        Ok(value) if shift != 0.0 => {
                            format!(r#"{}="{}""#, &attr[1], format_coordinate(value - shift))
                        }
                        _ => attr[0].to_owned(),
                    }
                })
                .into_owned()
        })
        .into_owned()
}

fn format_coordinate(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn axis_shift_auto(min: Option<f64>) -> f64 {
    match min {
        Some(min) if min < 0.0 => min,
        Some(min) if min > ORIGIN_MARGIN => min - ORIGIN_MARGIN,
        _ => 0.0,
    }
}

fn axis_shift_manual(min: Option<f64>) -> f64 {
    match min {
        Some(min) if min > ORIGIN_MARGIN => min - ORIGIN_MARGIN,
        _ => 0.0,
    }
}

fn normalize_with(xml: &str, axis_shift: fn(Option<f64>) -> f64) -> NormalizeOutcome {
    let scan = scan_coordinates(xml);
    if scan.tags == 0 {
        return NormalizeOutcome::NoGeometry;
    }
    if scan.min_x.is_none() && scan.min_y.is_none() {
        return NormalizeOutcome::NoPositionedCells;
    }

    let shift_x = axis_shift(scan.min_x);
    let shift_y = axis_shift(scan.min_y);
    if shift_x == 0.0 && shift_y == 0.0 {
        return NormalizeOutcome::NearOrigin;
    }

    NormalizeOutcome::Shifted {
        xml: shift_coordinates(xml, shift_x, shift_y),
        shift_x,
        shift_y,
    }
}

/// Autoload variant: rescues diagrams whose bounding box is negative or far
/// past the margin. Negative minima shift back to exactly zero; large minima
/// shift back to the margin.
pub fn normalize_near_origin(xml: &str) -> NormalizeOutcome {
    normalize_with(xml, axis_shift_auto)
}

/// Manual-action variant: only pulls diagrams in from far positive offsets.
/// Negative coordinates are left alone here; the autoload pass handles them.
pub fn normalize_manual(xml: &str) -> NormalizeOutcome {
    normalize_with(xml, axis_shift_manual)
}
