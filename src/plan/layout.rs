//! Row and stall layout from site geometry.

use crate::config::PlanningRules;

/// Half-open width interval `[lower_m, upper_m)` mapped to a row count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidthBand {
    /// Inclusive lower bound (m).
    pub lower_m: f64,
    /// Exclusive upper bound (m); the final band also includes it.
    pub upper_m: f64,
    /// Rows of stalls that fit in this band.
    pub rows: u32,
}

impl WidthBand {
    const fn new(lower_m: f64, upper_m: f64, rows: u32) -> Self {
        Self {
            lower_m,
            upper_m,
            rows,
        }
    }

    /// Whether `width_m` falls in this band. The last band is closed at
    /// [`MAX_WIDTH_M`].
    pub fn contains(&self, width_m: f64) -> bool {
        (width_m >= self.lower_m && width_m < self.upper_m)
            || (self.upper_m == MAX_WIDTH_M && width_m == MAX_WIDTH_M)
    }
}

/// Width-to-rows table. Bands alternate +15 m / +30 m, one extra row each.
pub const WIDTH_BANDS: [WidthBand; 22] = [
    WidthBand::new(30.0, 45.0, 1),
    WidthBand::new(45.0, 75.0, 2),
    WidthBand::new(75.0, 90.0, 3),
    WidthBand::new(90.0, 120.0, 4),
    WidthBand::new(120.0, 135.0, 5),
    WidthBand::new(135.0, 165.0, 6),
    WidthBand::new(165.0, 180.0, 7),
    WidthBand::new(180.0, 210.0, 8),
    WidthBand::new(210.0, 225.0, 9),
    WidthBand::new(225.0, 255.0, 10),
    WidthBand::new(255.0, 270.0, 11),
    WidthBand::new(270.0, 300.0, 12),
    WidthBand::new(300.0, 315.0, 13),
    WidthBand::new(315.0, 345.0, 14),
    WidthBand::new(345.0, 360.0, 15),
    WidthBand::new(360.0, 390.0, 16),
    WidthBand::new(390.0, 405.0, 17),
    WidthBand::new(405.0, 435.0, 18),
    WidthBand::new(435.0, 450.0, 19),
    WidthBand::new(450.0, 480.0, 20),
    WidthBand::new(480.0, 495.0, 21),
    WidthBand::new(495.0, 500.0, 22),
];

/// Narrowest site with room for a truck turning circle (m).
pub const MIN_WIDTH_M: f64 = 30.0;
/// Widest site covered by [`WIDTH_BANDS`] (m).
pub const MAX_WIDTH_M: f64 = 500.0;

/// Row count for a site width plus the note explaining it.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLookup {
    pub rows: u32,
    pub note: String,
}

pub(crate) fn length_gate_note(length_m: f64, min_length_m: f64) -> String {
    format!("Site length {length_m:.1} m < {min_length_m:.0} m: not enough room, site not viable.")
}

pub(crate) fn width_gate_note(width_m: f64) -> String {
    format!(
        "Site width {width_m:.1} m < {MIN_WIDTH_M:.0} m: turning radius insufficient, site not viable."
    )
}

/// Looks up the row count for `width_m`.
pub fn rows_for_width(width_m: f64) -> RowLookup {
    if width_m < MIN_WIDTH_M {
        return RowLookup {
            rows: 0,
            note: width_gate_note(width_m),
        };
    }
    if width_m > MAX_WIDTH_M {
        return RowLookup {
            rows: 0,
            note: format!(
                "Site width {width_m:.1} m > {MAX_WIDTH_M:.0} m: outside the width table, manual review required."
            ),
        };
    }

    match WIDTH_BANDS.iter().find(|band| band.contains(width_m)) {
        Some(band) => RowLookup {
            rows: band.rows,
            note: format!(
                "{:.0} m <= width {width_m:.1} m < {:.0} m: {} row(s) of stalls.",
                band.lower_m, band.upper_m, band.rows
            ),
        },
        None => RowLookup {
            rows: 0,
            note: format!("Site width {width_m:.1} m matched no width band, manual review required."),
        },
    }
}

/// Stall arrangement for one site.
#[derive(Debug, Clone, PartialEq)]
pub struct StallLayout {
    /// `floor(length / stall width)`, or 0 when the length gate fails.
    pub stalls_per_row_raw: u64,
    /// Stalls per row after the single-row parity correction.
    pub stalls_per_row_draw: u64,
    pub row_count: u32,
    /// Stalls left of the transformer (single-row layouts only).
    pub stalls_left: u64,
    /// Stalls right of the transformer (single-row layouts only).
    pub stalls_right: u64,
    pub stalls_total: u64,
    /// Row lookup note followed by any parity adjustments, joined with `"; "`.
    pub layout_note: String,
    /// Gate notes, layout note and parity notes in emission order.
    pub notes: Vec<String>,
}

impl StallLayout {
    /// Lays out stalls on a `length_m` × `width_m` site.
    pub fn compute(length_m: f64, width_m: f64, rules: &PlanningRules) -> Self {
        let min_length_m = rules.min_length_m();
        let mut notes = Vec::new();

        if length_m < min_length_m {
            notes.push(length_gate_note(length_m, min_length_m));
        }
        if width_m < MIN_WIDTH_M {
            notes.push(width_gate_note(width_m));
        }

        let stalls_per_row_raw = if rules.stall_width_m > 0.0 && length_m >= min_length_m {
            (length_m / rules.stall_width_m).floor() as u64
        } else {
            0
        };

        let lookup = rows_for_width(width_m);
        let row_count = lookup.rows;

        // Narrow sites repeat the gate text here, as the row lookup note.
        notes.push(lookup.note.clone());
        let mut layout_parts = vec![lookup.note];

        let mut stalls_per_row_draw = stalls_per_row_raw;
        let mut stalls_left = 0;
        let mut stalls_right = 0;

        if row_count == 1 {
            let mut stalls = stalls_per_row_raw;
            if stalls < 2 {
                stalls_per_row_draw = 0;
                let note = "Single row holds fewer than 2 stalls: the transformer cannot be centred."
                    .to_string();
                notes.push(note.clone());
                layout_parts.push(note);
            } else {
                if stalls % 2 == 1 {
                    let before = stalls;
                    stalls -= 1;
                    let note = format!(
                        "Single-row stall count must be even (2 stalls per pile): adjusted from {before} to {stalls}."
                    );
                    notes.push(note.clone());
                    layout_parts.push(note);
                }

                let mut left = stalls / 2;
                let mut right = stalls - left;
                if left % 2 == 1 {
                    left -= 1;
                    right += 1;
                }

                stalls_left = left;
                stalls_right = right;
                stalls_per_row_draw = stalls;
                let note = format!(
                    "Stalls either side of the transformer must be even: split as {left}+{right}."
                );
                notes.push(note.clone());
                layout_parts.push(note);
            }
        }

        let stalls_total = if row_count == 1 {
            stalls_per_row_draw
        } else {
            stalls_per_row_raw.saturating_mul(u64::from(row_count))
        };

        Self {
            stalls_per_row_raw,
            stalls_per_row_draw,
            row_count,
            stalls_left,
            stalls_right,
            stalls_total,
            layout_note: layout_parts.join("; "),
            notes,
        }
    }
}
