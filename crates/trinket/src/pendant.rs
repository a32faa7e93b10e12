//! Three-color bull pendant.
//!
//! Each color is a separate slab printed in sequence, with a filament change
//! between them:
//!
//! | layer | z range (defaults) | contents |
//! |-------|--------------------|----------|
//! | black | 0..1 | disc, chain tab, drilled chain ring |
//! | red   | 1..2 | inner disc, bull head (horns, face, ears, snout) |
//! | white | 2..3 | lettering, eyes, nostrils |
//!
//! The chain loop lies flat in the black layer, above the top of the disc
//! (+Y), so the layers never overlap in height.

use tracing::info;
use trinket_ir::{Assembly, Plan, Primitive, Role};
use trinket_mesh::{BooleanKernel, CsgKernel};

use crate::glyph::{layout_text, GlyphMetrics, StrokeFont};
use crate::{subtract_hole, Generated, GlyphError, Solid};

pub use crate::config::PendantParams;

/// Design name.
pub const DESIGN: &str = "bulls_pendant";

/// Output key to file stem, in print order.
pub const OUTPUTS: &[(&str, &str)] = &[
    ("black", "bulls_pendant_black_layer"),
    ("red", "bulls_pendant_red_layer"),
    ("white", "bulls_pendant_white_layer"),
    ("combined", "bulls_pendant_combined"),
];

/// Bull head discs in the red layer: name, radius, center, segments.
const BULL_HEAD: &[(&str, f64, (f64, f64), u32)] = &[
    ("left_horn", 3.0, (-8.0, 8.0), 32),
    ("right_horn", 3.0, (8.0, 8.0), 32),
    ("face", 8.0, (0.0, 3.0), 48),
    ("left_ear", 2.5, (-7.0, 5.0), 24),
    ("right_ear", 2.5, (7.0, 5.0), 24),
    ("snout", 5.0, (0.0, -3.0), 32),
];

/// Face details in the white layer.
const FACE_DETAIL: &[(&str, f64, (f64, f64), u32)] = &[
    ("left_eye", 0.8, (-2.5, 4.0), 16),
    ("right_eye", 0.8, (2.5, 4.0), 16),
    ("left_nostril", 0.5, (-1.5, -2.0), 12),
    ("right_nostril", 0.5, (1.5, -2.0), 12),
];

const CHAIN_HOLE_SEGMENTS: u32 = 24;
const RING_SEGMENTS: u32 = 32;

struct Layout {
    black: Assembly,
    chain_tab: Assembly,
    chain_ring: Assembly,
    chain_hole: Assembly,
    red: Assembly,
    white: Assembly,
}

impl Layout {
    fn into_plan(self) -> Plan {
        let mut plan = Plan::new(DESIGN);
        for assembly in [
            self.black,
            self.chain_tab,
            self.chain_ring,
            self.chain_hole,
            self.red,
            self.white,
        ] {
            plan.push(assembly);
        }
        plan
    }
}

fn discs(
    assembly: &mut Assembly,
    table: &[(&str, f64, (f64, f64), u32)],
    height: f64,
    z: f64,
) {
    for &(name, radius, (x, y), segments) in table {
        assembly.push(Primitive::cylinder(name, radius, height, segments).at(x, y, z));
    }
}

fn layout(p: &PendantParams) -> (Layout, Option<GlyphError>) {
    let r = p.radius();
    let black_z = p.black_height / 2.0;
    let red_z = p.black_height + p.red_height / 2.0;
    let white_bottom = p.black_height + p.red_height;
    let white_z = white_bottom + p.white_height / 2.0;

    let black = Assembly::new("black", Role::Base).with(
        Primitive::cylinder("disc", r, p.black_height, p.disc_segments).at(0.0, 0.0, black_z),
    );

    // tab reaches `loop_overlap` into both the disc and the ring
    let tab_length = p.loop_neck + 2.0 * p.loop_overlap;
    let chain_tab = Assembly::new("chain_tab", Role::Base).with(
        Primitive::cuboid("tab", p.loop_width, tab_length, p.black_height).at(
            0.0,
            r + p.loop_neck / 2.0,
            black_z,
        ),
    );
    let ring_y = p.loop_center_y();
    let chain_ring = Assembly::new("chain_ring", Role::Base).with(
        Primitive::cylinder("ring", p.loop_diameter / 2.0, p.black_height, RING_SEGMENTS)
            .at(0.0, ring_y, black_z),
    );
    let chain_hole = Assembly::new("chain_hole", Role::Hole).with(
        Primitive::cylinder(
            "chain_hole",
            p.loop_hole_diameter / 2.0,
            p.black_height + 1.0,
            CHAIN_HOLE_SEGMENTS,
        )
        .at(0.0, ring_y, black_z),
    );

    let mut red = Assembly::new("red", Role::Accent).with(
        Primitive::cylinder("inner_disc", r - p.rim_width, p.red_height, p.disc_segments)
            .at(0.0, 0.0, red_z),
    );
    discs(&mut red, BULL_HEAD, p.red_height, red_z);

    let mut white = Assembly::new("white", Role::Text);
    let metrics = GlyphMetrics {
        height: p.text_height,
        stroke: p.stroke_width,
    };
    let error = match layout_text(
        StrokeFont::Compact,
        &p.text,
        &metrics,
        (p.text_x, p.text_y),
        p.letter_spacing,
    ) {
        Ok(strokes) => {
            for (i, (letter, s)) in strokes.into_iter().enumerate() {
                white.push(
                    Primitive::cuboid(format!("{letter}_{i}"), s.width, s.height, p.white_height)
                        .at(s.x, s.y, white_z),
                );
            }
            None
        }
        Err(e) => Some(e),
    };
    discs(&mut white, FACE_DETAIL, p.white_height, white_z);

    let layout = Layout {
        black,
        chain_tab,
        chain_ring,
        chain_hole,
        red,
        white,
    };
    (layout, error)
}

/// Primitive placement for the pendant, without meshing.
pub fn plan(params: &PendantParams) -> Result<Plan, GlyphError> {
    match layout(params) {
        (_, Some(e)) => Err(e),
        (layout, None) => Ok(layout.into_plan()),
    }
}

/// Build the pendant with the default boolean kernel.
pub fn build(params: &PendantParams) -> Generated {
    build_with(params, &CsgKernel)
}

/// Build the pendant with a caller-supplied boolean kernel.
///
/// Returns `"black"`, `"red"`, `"white"` and `"combined"` solids. A failed
/// chain-hole subtraction leaves the ring solid and records a warning.
pub fn build_with<K: BooleanKernel + ?Sized>(params: &PendantParams, kernel: &K) -> Generated {
    let mut out = Generated::new(DESIGN);
    let (layout, glyph_error) = layout(params);
    if let Some(e) = glyph_error {
        out.warn("lettering omitted", &e);
    }

    let disc = out.evaluate(&layout.black);
    info!(diameter = params.diameter, height = params.black_height, "created black disc");

    let tab = out.evaluate(&layout.chain_tab);
    let ring = out.evaluate(&layout.chain_ring);
    let hole = out.evaluate(&layout.chain_hole);
    let ring = subtract_hole(&ring, &hole, kernel, &mut out);
    info!(hole = params.loop_hole_diameter, "created chain loop");

    let mut black = Solid::concatenate("black", [&disc, &tab, &ring]);
    let mut red = out.evaluate(&layout.red);
    info!(parts = layout.red.len(), "created red bull head");
    let mut white = out.evaluate(&layout.white);
    info!(text = %params.text, parts = layout.white.len(), "created white details");

    let mut combined = Solid::concatenate("combined", [&black, &red, &white]);
    for solid in [&mut black, &mut red, &mut white, &mut combined] {
        solid.tidy();
    }
    info!(triangles = combined.num_triangles(), "pendant complete");

    out.insert("black", black);
    out.insert("red", red);
    out.insert("white", white);
    out.insert("combined", combined);
    out
}
