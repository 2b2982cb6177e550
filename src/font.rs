// src/font.rs
//
// Tiny bitmap font: a monochrome glyph atlas built once at startup plus a
// lookup table of atlas rectangles, blitted into RGBA pixel buffers with
// nearest-neighbor scaling.

use std::collections::HashMap;

const ATLAS_WIDTH: i32 = 56;
const ATLAS_HEIGHT: i32 = 17;

/// Background texels carry the color key and are skipped when blitting.
const COLOR_KEY: [u8; 4] = [255, 0, 220, 0];
const GLYPH_RGBA: [u8; 4] = [255, 255, 255, 255];

const GLYPH_HEIGHT: i32 = 5;
/// Horizontal advance for a space, in unscaled pixels.
const SPACE_ADVANCE: i32 = 3;
/// Vertical advance for a newline: one glyph row plus spacing.
const LINE_ADVANCE: i32 = GLYPH_HEIGHT + 1;

/// A rectangular region inside the atlas. Immutable once registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

// Curated glyph set: (character, atlas x, atlas y, width, rows top to bottom).
// Every glyph is 5 rows tall; the cells are packed edge to edge, which is why
// 1 px wide glyphs get a widened source rectangle at blit time.
#[rustfmt::skip]
const GLYPH_CELLS: &[(char, i32, i32, i32, [u8; 5])] = &[
    ('A',  0,  0, 3, [0b010, 0b101, 0b111, 0b101, 0b101]),
    ('B',  4,  0, 3, [0b110, 0b101, 0b110, 0b101, 0b110]),
    ('C',  8,  0, 3, [0b011, 0b100, 0b100, 0b100, 0b011]),
    ('D', 12,  0, 3, [0b110, 0b101, 0b101, 0b101, 0b110]),
    ('E', 16,  0, 3, [0b111, 0b100, 0b110, 0b100, 0b111]),
    ('F', 20,  0, 3, [0b111, 0b100, 0b110, 0b100, 0b100]),
    ('G', 24,  0, 3, [0b011, 0b100, 0b101, 0b101, 0b011]),
    ('H', 28,  0, 3, [0b101, 0b101, 0b111, 0b101, 0b101]),
    ('I', 33,  0, 1, [0b1,   0b1,   0b1,   0b1,   0b1  ]),
    ('J', 36,  0, 3, [0b011, 0b001, 0b001, 0b101, 0b010]),
    ('K', 40,  0, 3, [0b101, 0b101, 0b110, 0b101, 0b101]),
    ('L', 44,  0, 3, [0b100, 0b100, 0b100, 0b100, 0b111]),
    ('M', 48,  0, 5, [0b10001, 0b11011, 0b10101, 0b10001, 0b10001]),

    ('N',  0,  6, 3, [0b110, 0b101, 0b101, 0b101, 0b101]),
    ('O',  4,  6, 3, [0b010, 0b101, 0b101, 0b101, 0b010]),
    ('P',  8,  6, 3, [0b110, 0b101, 0b110, 0b100, 0b100]),
    ('Q', 12,  6, 3, [0b010, 0b101, 0b101, 0b010, 0b001]),
    ('R', 16,  6, 3, [0b110, 0b101, 0b110, 0b101, 0b101]),
    ('S', 20,  6, 3, [0b011, 0b100, 0b010, 0b001, 0b110]),
    ('T', 24,  6, 3, [0b111, 0b010, 0b010, 0b010, 0b010]),
    ('U', 28,  6, 3, [0b101, 0b101, 0b101, 0b101, 0b111]),
    ('V', 32,  6, 3, [0b101, 0b101, 0b101, 0b101, 0b010]),
    ('W', 36,  6, 5, [0b10001, 0b10001, 0b10101, 0b10101, 0b01010]),
    ('X', 42,  6, 3, [0b101, 0b101, 0b010, 0b101, 0b101]),
    ('Y', 46,  6, 3, [0b101, 0b101, 0b010, 0b010, 0b010]),
    ('Z', 50,  6, 3, [0b111, 0b001, 0b010, 0b100, 0b111]),

    ('0',  0, 12, 3, [0b111, 0b101, 0b101, 0b101, 0b111]),
    ('1',  4, 12, 3, [0b010, 0b110, 0b010, 0b010, 0b111]),
    ('2',  8, 12, 3, [0b110, 0b001, 0b010, 0b100, 0b111]),
    ('3', 12, 12, 3, [0b110, 0b001, 0b010, 0b001, 0b110]),
    ('4', 16, 12, 3, [0b101, 0b101, 0b111, 0b001, 0b001]),
    ('5', 20, 12, 3, [0b111, 0b100, 0b110, 0b001, 0b110]),
    ('6', 24, 12, 3, [0b011, 0b100, 0b110, 0b101, 0b010]),
    ('7', 28, 12, 3, [0b111, 0b001, 0b001, 0b010, 0b010]),
    ('8', 32, 12, 3, [0b010, 0b101, 0b010, 0b101, 0b010]),
    ('9', 36, 12, 3, [0b010, 0b101, 0b011, 0b001, 0b110]),

    ('!', 41, 12, 1, [0b1, 0b1, 0b1, 0b0, 0b1]),
    ('?', 44, 12, 3, [0b110, 0b001, 0b010, 0b000, 0b010]),
    ('#', 48, 12, 5, [0b01010, 0b11111, 0b01010, 0b11111, 0b01010]),
    (':', 55, 12, 1, [0b0, 0b1, 0b0, 0b1, 0b0]),
];

/// The shared glyph atlas plus the character lookup table. Built once at
/// startup; never mutated afterwards.
pub struct FontAtlas {
    pixels: Vec<u8>,
    glyphs: HashMap<char, Glyph>,
}

impl FontAtlas {
    pub fn new() -> Self {
        let mut pixels = Vec::with_capacity((ATLAS_WIDTH * ATLAS_HEIGHT) as usize * 4);
        for _ in 0..ATLAS_WIDTH * ATLAS_HEIGHT {
            pixels.extend_from_slice(&COLOR_KEY);
        }

        let mut glyphs = HashMap::with_capacity(GLYPH_CELLS.len());
        for &(ch, x, y, width, rows) in GLYPH_CELLS {
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..width {
                    if (bits >> (width - 1 - col)) & 1 == 0 {
                        continue;
                    }
                    let off = (((y + row as i32) * ATLAS_WIDTH + x + col) * 4) as usize;
                    pixels[off..off + 4].copy_from_slice(&GLYPH_RGBA);
                }
            }
            glyphs.insert(
                ch,
                Glyph {
                    x,
                    y,
                    width,
                    height: GLYPH_HEIGHT,
                },
            );
        }

        Self { pixels, glyphs }
    }

    /// Case-folded glyph lookup. `None` for anything outside the curated set.
    pub fn glyph(&self, ch: char) -> Option<Glyph> {
        self.glyphs.get(&ch.to_ascii_uppercase()).copied()
    }

    /// Cursor advance for one character at the given scale. Unregistered
    /// characters advance by nothing, matching their silent skip when drawn.
    pub fn advance(&self, ch: char, scale: i32) -> i32 {
        let scale = scale.max(1);
        match ch {
            ' ' => SPACE_ADVANCE * scale,
            '\n' => 0,
            _ => self.glyph(ch).map_or(0, |g| (g.width + 1) * scale),
        }
    }

    /// Draws `text` into an RGBA pixel buffer of `dest_w` x `dest_h` pixels
    /// with `stride` bytes per row. Space advances the cursor without
    /// drawing, newline returns to the starting column one row down, and
    /// characters outside the curated set are skipped.
    pub fn draw_text(
        &self,
        dest: &mut [u8],
        stride: usize,
        dest_w: i32,
        dest_h: i32,
        text: &str,
        x: i32,
        y: i32,
        scale: i32,
    ) {
        let scale = scale.max(1);
        let mut cursor_x = x;
        let mut cursor_y = y;

        for ch in text.chars() {
            if ch == '\n' {
                cursor_x = x;
                cursor_y += LINE_ADVANCE * scale;
                continue;
            }
            if ch == ' ' {
                cursor_x += SPACE_ADVANCE * scale;
                continue;
            }
            let Some(glyph) = self.glyph(ch) else {
                continue;
            };
            self.blit_glyph(dest, stride, dest_w, dest_h, glyph, cursor_x, cursor_y, scale);
            cursor_x += (glyph.width + 1) * scale;
        }
    }

    /// Atlas region sampled for a glyph. The cells pack edge to edge, so
    /// 1 px wide glyphs widen the source by one blank spacer column to keep
    /// nearest-neighbor sampling off the neighboring cell.
    fn source_rect(glyph: Glyph) -> Glyph {
        if glyph.width == 1 {
            Glyph {
                x: glyph.x - 1,
                width: glyph.width + 1,
                ..glyph
            }
        } else {
            glyph
        }
    }

    #[inline]
    fn atlas_texel(&self, x: i32, y: i32) -> [u8; 4] {
        if x < 0 || y < 0 || x >= ATLAS_WIDTH || y >= ATLAS_HEIGHT {
            return COLOR_KEY;
        }
        let off = ((y * ATLAS_WIDTH + x) * 4) as usize;
        [
            self.pixels[off],
            self.pixels[off + 1],
            self.pixels[off + 2],
            self.pixels[off + 3],
        ]
    }

    fn blit_glyph(
        &self,
        dest: &mut [u8],
        stride: usize,
        dest_w: i32,
        dest_h: i32,
        glyph: Glyph,
        dx0: i32,
        dy0: i32,
        scale: i32,
    ) {
        let src = Self::source_rect(glyph);
        let dst_w = glyph.width * scale;
        let dst_h = glyph.height * scale;

        for dy in 0..dst_h {
            let py = dy0 + dy;
            if py < 0 || py >= dest_h {
                continue;
            }
            // Nearest-neighbor sample at the destination pixel center.
            let sy = src.y + (2 * dy + 1) * src.height / (2 * dst_h);
            for dx in 0..dst_w {
                let px = dx0 + dx;
                if px < 0 || px >= dest_w {
                    continue;
                }
                let sx = src.x + (2 * dx + 1) * src.width / (2 * dst_w);
                let texel = self.atlas_texel(sx, sy);
                if texel == COLOR_KEY {
                    continue;
                }
                let off = py as usize * stride + px as usize * 4;
                if off + 3 < dest.len() {
                    dest[off] = texel[0];
                    dest[off + 1] = texel[1];
                    dest[off + 2] = texel[2];
                    dest[off + 3] = texel[3];
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: i32 = 32;
    const H: i32 = 16;

    fn buffer() -> Vec<u8> {
        vec![0u8; (W * H * 4) as usize]
    }

    fn lit(buf: &[u8]) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..H {
            for x in 0..W {
                if buf[(y * W + x) as usize * 4 + 3] != 0 {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn curated_set_is_registered_with_original_layout() {
        let font = FontAtlas::new();
        for ch in ('A'..='Z').chain('0'..='9').chain("!?#:".chars()) {
            assert!(font.glyph(ch).is_some(), "missing {ch:?}");
        }
        assert_eq!(
            font.glyph('A'),
            Some(Glyph { x: 0, y: 0, width: 3, height: 5 })
        );
        assert_eq!(
            font.glyph('I'),
            Some(Glyph { x: 33, y: 0, width: 1, height: 5 })
        );
        assert_eq!(
            font.glyph('#'),
            Some(Glyph { x: 48, y: 12, width: 5, height: 5 })
        );
        assert_eq!(
            font.glyph(':'),
            Some(Glyph { x: 55, y: 12, width: 1, height: 5 })
        );
    }

    #[test]
    fn lookup_is_case_folded() {
        let font = FontAtlas::new();
        assert_eq!(font.glyph('a'), font.glyph('A'));
        assert_eq!(font.glyph('z'), font.glyph('Z'));
    }

    #[test]
    fn draw_a_at_scale_one_blits_three_by_five_at_origin() {
        let font = FontAtlas::new();
        let mut buf = buffer();
        font.draw_text(&mut buf, (W * 4) as usize, W, H, "A", 0, 0, 1);

        let expected: Vec<(i32, i32)> = [0b010, 0b101, 0b111, 0b101, 0b101]
            .iter()
            .enumerate()
            .flat_map(|(y, bits)| {
                (0..3)
                    .filter(move |col| (bits >> (2 - col)) & 1 == 1)
                    .map(move |col| (col, y as i32))
            })
            .collect();
        assert_eq!(lit(&buf), expected);
    }

    #[test]
    fn one_px_glyph_widens_source_but_not_destination() {
        let font = FontAtlas::new();
        let i = font.glyph('I').unwrap();
        let src = FontAtlas::source_rect(i);
        assert_eq!((src.x, src.width), (32, 2));

        let mut buf = buffer();
        font.draw_text(&mut buf, (W * 4) as usize, W, H, "I", 0, 0, 1);
        // Destination blit stays 1 px wide and lands on the glyph column.
        assert_eq!(lit(&buf), vec![(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]);
    }

    #[test]
    fn unregistered_characters_are_skipped_silently() {
        let font = FontAtlas::new();
        let mut buf = buffer();
        font.draw_text(&mut buf, (W * 4) as usize, W, H, "[;]", 0, 0, 1);
        assert!(lit(&buf).is_empty());
        assert_eq!(font.advance('[', 1), 0);
    }

    #[test]
    fn case_folded_strings_render_identically() {
        let font = FontAtlas::new();
        let mut upper = buffer();
        let mut lower = buffer();
        font.draw_text(&mut upper, (W * 4) as usize, W, H, "PAUSED", 0, 0, 1);
        font.draw_text(&mut lower, (W * 4) as usize, W, H, "paused", 0, 0, 1);
        assert_eq!(upper, lower);
    }

    #[test]
    fn space_advances_without_drawing() {
        let font = FontAtlas::new();
        let mut buf = buffer();
        font.draw_text(&mut buf, (W * 4) as usize, W, H, "I I", 0, 0, 1);
        // First I at column 0, then advance 2 for the glyph and 3 for the
        // space puts the second I at column 5.
        let cols: Vec<i32> = lit(&buf).iter().map(|&(x, _)| x).collect();
        assert!(cols.iter().all(|&x| x == 0 || x == 5));
        assert_eq!(lit(&buf).len(), 10);
    }

    #[test]
    fn newline_resets_column_and_advances_row() {
        let font = FontAtlas::new();
        let mut buf = buffer();
        font.draw_text(&mut buf, (W * 4) as usize, W, H, "I\nI", 2, 0, 1);
        let pixels = lit(&buf);
        assert!(pixels.iter().all(|&(x, _)| x == 2));
        assert!((0..5).all(|y| pixels.contains(&(2, y))));
        assert!((6..11).all(|y| pixels.contains(&(2, y))));
    }

    #[test]
    fn advance_accounts_for_glyph_width_and_spacing() {
        let font = FontAtlas::new();
        assert_eq!(font.advance('A', 1), 4);
        assert_eq!(font.advance('M', 1), 6);
        assert_eq!(font.advance('!', 1), 2);
        assert_eq!(font.advance(' ', 1), 3);
        assert_eq!(font.advance('A', 2), 8);
    }

    #[test]
    fn drawing_clips_at_buffer_edges() {
        let font = FontAtlas::new();
        let mut buf = buffer();
        font.draw_text(&mut buf, (W * 4) as usize, W, H, "M", -2, -2, 1);
        font.draw_text(&mut buf, (W * 4) as usize, W, H, "M", W - 2, H - 2, 1);
        for (x, y) in lit(&buf) {
            assert!((0..W).contains(&x) && (0..H).contains(&y));
        }
    }

    #[test]
    fn scaled_blit_is_nearest_neighbor() {
        let font = FontAtlas::new();
        let mut buf = buffer();
        font.draw_text(&mut buf, (W * 4) as usize, W, H, "T", 0, 0, 2);
        let pixels = lit(&buf);
        // Top bar of T doubles to a 6x2 block.
        for x in 0..6 {
            assert!(pixels.contains(&(x, 0)));
            assert!(pixels.contains(&(x, 1)));
        }
        // Stem doubles to columns 2 and 3.
        for y in 2..10 {
            assert!(pixels.contains(&(2, y)));
            assert!(pixels.contains(&(3, y)));
            assert!(!pixels.contains(&(0, y)));
            assert!(!pixels.contains(&(5, y)));
        }
    }
}
