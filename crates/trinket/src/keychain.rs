//! Text keychain: a flat bar with a keyring hole and embossed lettering.
//!
//! The bar's corner sits at the origin, so it spans `[0, length] × [0, width]
//! × [0, height]`. The hole goes through the bar `hole_inset` from the right
//! edge; the lettering stands `text_depth` proud of the top face.

use tracing::info;
use trinket_ir::{Assembly, Plan, Primitive, Role};
use trinket_mesh::{BooleanKernel, CsgKernel};

use crate::glyph::{layout_text, GlyphMetrics, StrokeFont};
use crate::{subtract_hole, Generated, GlyphError, Solid};

pub use crate::config::KeychainParams;

/// Design name.
pub const DESIGN: &str = "austin_keychain";

/// Output key to file stem.
pub const OUTPUTS: &[(&str, &str)] = &[("keychain", "austin_keychain")];

struct Layout {
    base: Assembly,
    hole: Assembly,
    text: Assembly,
}

fn layout(params: &KeychainParams) -> (Layout, Option<GlyphError>) {
    let base = Assembly::new("base", Role::Base).with(
        Primitive::cuboid("bar", params.length, params.width, params.height).at(
            params.length / 2.0,
            params.width / 2.0,
            params.height / 2.0,
        ),
    );

    // one unit taller than the bar so both caps clear it
    let (hx, hy) = params.hole_center();
    let hole = Assembly::new("keyring_hole", Role::Hole).with(
        Primitive::cylinder(
            "keyring_hole",
            params.hole_diameter / 2.0,
            params.height + 1.0,
            params.hole_segments,
        )
        .at(hx, hy, params.height / 2.0),
    );

    let metrics = GlyphMetrics {
        height: params.text_height,
        stroke: params.stroke_width,
    };
    let mut text = Assembly::new("text", Role::Text);
    let z = params.height + params.text_depth / 2.0;
    let strokes = layout_text(
        StrokeFont::Block,
        &params.text,
        &metrics,
        (params.text_x, params.width / 2.0),
        params.letter_spacing,
    );
    let error = match strokes {
        Ok(strokes) => {
            for (i, (letter, s)) in strokes.into_iter().enumerate() {
                text.push(
                    Primitive::cuboid(format!("{letter}_{i}"), s.width, s.height, params.text_depth)
                        .at(s.x, s.y, z),
                );
            }
            None
        }
        Err(e) => Some(e),
    };

    (Layout { base, hole, text }, error)
}

impl Layout {
    fn into_plan(self) -> Plan {
        let mut plan = Plan::new(DESIGN);
        plan.push(self.base);
        plan.push(self.hole);
        plan.push(self.text);
        plan
    }
}

/// Primitive placement for the keychain, without meshing.
pub fn plan(params: &KeychainParams) -> Result<Plan, GlyphError> {
    match layout(params) {
        (_, Some(e)) => Err(e),
        (layout, None) => Ok(layout.into_plan()),
    }
}

/// Build the keychain with the default boolean kernel.
pub fn build(params: &KeychainParams) -> Generated {
    build_with(params, &CsgKernel)
}

/// Build the keychain with a caller-supplied boolean kernel.
///
/// Returns one solid under `"keychain"`. Boolean or lettering failures end
/// up in [`Generated::warnings`]; the build itself never fails.
pub fn build_with<K: BooleanKernel + ?Sized>(params: &KeychainParams, kernel: &K) -> Generated {
    let mut out = Generated::new(DESIGN);
    let (layout, glyph_error) = layout(params);
    if let Some(e) = glyph_error {
        out.warn("lettering omitted", &e);
    }

    let base = out.evaluate(&layout.base);
    info!(
        length = params.length,
        width = params.width,
        height = params.height,
        "created base"
    );

    let hole = out.evaluate(&layout.hole);
    let drilled = subtract_hole(&base, &hole, kernel, &mut out);

    let text = out.evaluate(&layout.text);
    info!(text = %params.text, strokes = layout.text.len(), "created lettering");

    let mut keychain = Solid::concatenate(DESIGN, [&drilled, &text]);
    keychain.tidy();
    info!(triangles = keychain.num_triangles(), "keychain complete");

    out.insert("keychain", keychain);
    out
}
