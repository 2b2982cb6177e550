// src/render.rs
//
// CPU rasterization of the two texture layers: the opaque grid image and
// the translucent UI overlay. Both are written into 256-byte-aligned RGBA
// upload buffers at grid resolution; the GPU blit scales them to the window.

use crate::font::FontAtlas;
use crate::life::LifeGrid;

const ALIVE: [u8; 4] = [255, 255, 255, 255];
const DEAD: [u8; 4] = [0, 0, 0, 255];
const BRUSH: [u8; 4] = [255, 255, 255, 100];

/// Per-frame overlay inputs, derived from input state before rendering.
pub struct OverlayState {
    /// Pointer position in grid coordinates, if the pointer is over the window.
    pub cursor_cell: Option<(i32, i32)>,
    pub brush_radius: i32,
    pub paused: bool,
}

/// Writes the committed grid as one texel per cell: white alive, black dead.
pub fn rasterize_grid(grid: &LifeGrid, frame: &mut [u8], stride: usize) {
    for y in 0..grid.height() {
        let row = &mut frame[y as usize * stride..];
        for x in 0..grid.width() {
            let c = if grid.query(x, y) { ALIVE } else { DEAD };
            let off = x as usize * 4;
            row[off] = c[0];
            row[off + 1] = c[1];
            row[off + 2] = c[2];
            row[off + 3] = c[3];
        }
    }
}

/// Clears the overlay to transparent, then draws the brush footprint and the
/// status text. The footprint covers the same half-open square the brush
/// would paint.
pub fn rasterize_ui(
    frame: &mut [u8],
    stride: usize,
    width: i32,
    height: i32,
    font: &FontAtlas,
    overlay: &OverlayState,
) {
    frame.fill(0);

    if let Some((cx, cy)) = overlay.cursor_cell {
        let r = overlay.brush_radius.max(0);
        for dy in -r..r {
            let y = cy + dy;
            if y < 0 || y >= height {
                continue;
            }
            for dx in -r..r {
                let x = cx + dx;
                if x < 0 || x >= width {
                    continue;
                }
                let off = y as usize * stride + x as usize * 4;
                frame[off] = BRUSH[0];
                frame[off + 1] = BRUSH[1];
                frame[off + 2] = BRUSH[2];
                frame[off + 3] = BRUSH[3];
            }
        }
    }

    if overlay.paused {
        font.draw_text(frame, stride, width, height, "Paused", 3, 3, 1);
    }
    let brush_label = format!("Brush Size: {}", overlay.brush_radius);
    font.draw_text(frame, stride, width, height, &brush_label, 3, 9, 1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(frame: &[u8], stride: usize, x: i32, y: i32) -> [u8; 4] {
        let off = y as usize * stride + x as usize * 4;
        [frame[off], frame[off + 1], frame[off + 2], frame[off + 3]]
    }

    #[test]
    fn grid_layer_is_white_on_black() {
        let mut grid = LifeGrid::new(8, 4);
        grid.begin_frame();
        grid.paint(true, 2, 1);
        grid.commit();

        let stride = 8 * 4;
        let mut frame = vec![0u8; stride * 4];
        rasterize_grid(&grid, &mut frame, stride);

        assert_eq!(pixel(&frame, stride, 2, 1), ALIVE);
        assert_eq!(pixel(&frame, stride, 0, 0), DEAD);
        assert_eq!(pixel(&frame, stride, 7, 3), DEAD);
    }

    #[test]
    fn brush_footprint_matches_paint_square_and_clips() {
        let font = FontAtlas::new();
        let stride = 16 * 4;
        let mut frame = vec![0u8; stride * 12];
        let overlay = OverlayState {
            cursor_cell: Some((0, 11)),
            brush_radius: 2,
            paused: false,
        };
        rasterize_ui(&mut frame, stride, 16, 12, &font, &overlay);

        let mut translucent = Vec::new();
        for y in 0..12 {
            for x in 0..16 {
                if pixel(&frame, stride, x, y) == BRUSH {
                    translucent.push((x, y));
                }
            }
        }
        // [-2, 2) x [9, 13) clipped to the frame leaves [0, 2) x [9, 12).
        assert_eq!(translucent, vec![(0, 9), (1, 9), (0, 10), (1, 10), (0, 11), (1, 11)]);
    }

    #[test]
    fn paused_text_only_appears_when_paused() {
        let font = FontAtlas::new();
        let stride = 64 * 4;
        let mut paused_frame = vec![0u8; stride * 20];
        let mut running_frame = vec![0u8; stride * 20];

        let mut overlay = OverlayState {
            cursor_cell: None,
            brush_radius: 1,
            paused: true,
        };
        rasterize_ui(&mut paused_frame, stride, 64, 20, &font, &overlay);
        overlay.paused = false;
        rasterize_ui(&mut running_frame, stride, 64, 20, &font, &overlay);

        let row_has_text = |frame: &[u8], y: i32| -> bool {
            (0..64).any(|x| pixel(frame, stride, x, y)[3] == 255)
        };
        // "Paused" occupies rows 3..8, the brush label rows 9..14.
        assert!(row_has_text(&paused_frame, 3));
        assert!(!row_has_text(&running_frame, 3));
        assert!(row_has_text(&paused_frame, 9));
        assert!(row_has_text(&running_frame, 9));
    }
}
