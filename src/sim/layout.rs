//! Static playfield geometry
//!
//! Holes are laid out row-major on a fixed grid in logical game space.
//! The layout is rebuilt wholesale (never mutated) when the tuning changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Hole radius as a fraction of the smaller cell dimension
const HOLE_RADIUS_FRACTION: f32 = 0.28;
/// Vertical position of the hole centre within its cell
const HOLE_CELL_Y: f32 = 0.55;
/// Horizontal distance of the pause button centre from the right HUD edge
const PAUSE_BUTTON_INSET: f32 = 20.0;
/// Horizontal distance of the mute button centre from the right HUD edge
const MUTE_BUTTON_INSET: f32 = 70.0;
/// HUD inner padding before the buttons start
const HUD_INNER_PADDING: f32 = 30.0;

/// A fixed slot a mole can appear in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    /// Row-major grid index (0-based)
    pub index: usize,
    pub center: Vec2,
    pub radius: f32,
}

/// Round HUD button in logical space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub center: Vec2,
    pub radius: f32,
}

impl Button {
    pub fn contains(&self, point: Vec2) -> bool {
        point.distance_squared(self.center) <= self.radius * self.radius
    }
}

/// Complete static layout: hole grid plus HUD hit targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub holes: Vec<Hole>,
    pub pause_button: Button,
    pub mute_button: Button,
}

impl Layout {
    pub fn build(tuning: &Tuning) -> Self {
        let grid_w = tuning.logical_width - tuning.grid_padding * 2.0;
        let grid_h = tuning.logical_height - tuning.grid_top_offset - tuning.grid_padding;
        let cell_w = grid_w / tuning.grid_cols as f32;
        let cell_h = grid_h / tuning.grid_rows as f32;
        let radius = cell_w.min(cell_h) * HOLE_RADIUS_FRACTION;

        let mut holes = Vec::with_capacity(tuning.grid_rows as usize * tuning.grid_cols as usize);
        for row in 0..tuning.grid_rows {
            for col in 0..tuning.grid_cols {
                holes.push(Hole {
                    index: row as usize * tuning.grid_cols as usize + col as usize,
                    center: Vec2::new(
                        tuning.grid_padding + cell_w * (col as f32 + 0.5),
                        tuning.grid_top_offset + cell_h * (row as f32 + HOLE_CELL_Y),
                    ),
                    radius,
                });
            }
        }

        // Buttons sit on the right of the HUD bar
        let center_y = tuning.hud_margin + tuning.hud_height / 2.0;
        let right = tuning.logical_width - tuning.hud_margin - HUD_INNER_PADDING;
        let pause_button = Button {
            center: Vec2::new(right - PAUSE_BUTTON_INSET, center_y),
            radius: tuning.hud_button_radius,
        };
        let mute_button = Button {
            center: Vec2::new(right - MUTE_BUTTON_INSET, center_y),
            radius: tuning.hud_button_radius,
        };

        Self {
            holes,
            pause_button,
            mute_button,
        }
    }

    pub fn hole(&self, index: usize) -> Option<&Hole> {
        self.holes.get(index)
    }
}
