//! Filler "decoded" text shown on the back face of each card.
//!
//! The text is purely cosmetic: a flow of code-looking snippets cut into a
//! fixed grid of rows and columns sized to the card face.

use super::constants::{CODE_CHAR_WIDTH_PX, CODE_FONT_SIZE_PX, CODE_LINE_HEIGHT_PX};
use rand::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CodeDimensions {
    pub columns: usize,
    pub rows: usize,
    pub font_size_px: f32,
    pub line_height_px: f32,
}

/// Grid that fits a face of the given pixel size.
pub fn code_dimensions(face_width: f32, face_height: f32) -> CodeDimensions {
    CodeDimensions {
        columns: (face_width.max(0.0) / CODE_CHAR_WIDTH_PX).floor() as usize,
        rows: (face_height.max(0.0) / CODE_LINE_HEIGHT_PX).floor() as usize,
        font_size_px: CODE_FONT_SIZE_PX,
        line_height_px: CODE_LINE_HEIGHT_PX,
    }
}

const HEADER: &[&str] = &[
    "// scanner preview build",
    "// decorative output, never executed",
    "const BAND_WIDTH: f32 = 8.0;",
    "const FADE_ZONE: f32 = 35.0;",
    "const MAX_PARTICLES: usize = 2500;",
    "const EASE: f32 = 0.05;",
];

const HELPERS: &[&str] = &[
    "fn clamp01(v: f32) -> f32 { v.max(0.0).min(1.0) }",
    "fn mix(a: f32, b: f32, t: f32) -> f32 { a + (b - a) * t }",
    "let started = Instant::now();",
    "fn jitter(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 { rng.gen_range(lo..hi) }",
];

const BEAM_BLOCK: &[&str] = &[
    "let beam = Beam {",
    "    x: viewport.width * 0.5,",
    "    width: BAND_WIDTH,",
    "    glow: 3.5,",
    "};",
    "fn splat(ctx: &Ctx, p: &Spark) {",
    "    ctx.alpha(clamp01(p.a));",
    "    ctx.blit(&sprite, p.x - p.r, p.y - p.r, p.r * 2.0);",
    "}",
];

const LOOP_BLOCK: &[&str] = &[
    "fn tick(&mut self, now: f64) {",
    "    let dt = 0.016;",
    "    self.step(dt);",
    "    self.draw();",
    "}",
];

const MISC: &[&str] = &[
    "let mut state = State { intensity: 1.2, budget: MAX_PARTICLES };",
    "let bounds = Rect::new(0.0, 0.0, viewport.width, 300.0);",
    "let sprite = Sprite::radial(16, [255, 255, 255]);",
    "ctx.blend(Blend::Additive);",
    "// decoded face is masked by the beam seam",
];

fn spark_block(idx: usize) -> Vec<String> {
    vec![
        format!("struct Spark{} {{", idx),
        "    x: f32, y: f32, vx: f32, vy: f32, r: f32, a: f32,".to_string(),
        "}".to_string(),
        format!("impl Spark{} {{", idx),
        "    fn step(&mut self, dt: f32) { self.x += self.vx * dt; self.y += self.vy * dt; }"
            .to_string(),
        "}".to_string(),
    ]
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn snippet_library<R: Rng + ?Sized>(rng: &mut R) -> Vec<String> {
    let mut lib: Vec<String> = Vec::with_capacity(96);
    lib.extend(HEADER.iter().map(|s| s.to_string()));
    lib.extend(HELPERS.iter().map(|s| s.to_string()));
    for b in 0..3 {
        lib.extend(spark_block(b));
    }
    lib.extend(BEAM_BLOCK.iter().map(|s| s.to_string()));
    lib.extend(LOOP_BLOCK.iter().map(|s| s.to_string()));
    lib.extend(MISC.iter().map(|s| s.to_string()));
    for i in 0..40 {
        let a = rng.gen_range(1..=9);
        let b = rng.gen_range(10..=99);
        let c = rng.gen_range(1..=9);
        lib.push(format!("let v{} = ({} + {}) as f32 * 0.{};", i, a, b, c));
    }
    for i in 0..20 {
        lib.push(format!(
            "if state.intensity > {}.0 {{ beam.glow += 0.01; }}",
            1 + (i % 3)
        ));
    }
    lib
}

/// Produce `rows` lines of exactly `columns` characters, joined by `\n`.
pub fn generate_code<R: Rng + ?Sized>(columns: usize, rows: usize, rng: &mut R) -> String {
    if columns == 0 || rows == 0 {
        return String::new();
    }
    let lib = snippet_library(rng);
    let mut flow = collapse_whitespace(&lib.join(" "));
    let needed = columns * rows + columns;
    while flow.len() < needed {
        if let Some(extra) = lib.choose(rng) {
            flow.push(' ');
            flow.push_str(&collapse_whitespace(extra));
        }
    }

    // Snippets are ASCII, so byte offsets are char offsets.
    let bytes = flow.as_bytes();
    let mut out = String::with_capacity((columns + 1) * rows);
    for row in 0..rows {
        let start = (row * columns).min(bytes.len());
        let end = (start + columns).min(bytes.len());
        out.push_str(&flow[start..end]);
        for _ in (end - start)..columns {
            out.push(' ');
        }
        if row + 1 < rows {
            out.push('\n');
        }
    }
    out
}
