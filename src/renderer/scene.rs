//! Draws a snapshot into a pixel buffer
//!
//! Simulation space is scaled uniformly to fit the buffer and centred
//! horizontally. The renderer only ever reads the snapshot.

use super::pixels::{PixelBuf, Rgb};
use crate::sim::{GamePhase, Snapshot};
use crate::tuning::Tuning;

pub const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const BACKDROP: Rgb = Rgb(20, 24, 32);
const GRASS: Rgb = Rgb(84, 168, 55);
const DIRT: Rgb = Rgb(210, 185, 110);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const BIRD_Y: Rgb = Rgb(245, 200, 66);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);
const PANEL: Rgb = Rgb(220, 195, 120);

// 3x5 bitmap digits
#[rustfmt::skip]
static DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

// Letters for the key hints, same grid as the digits
#[rustfmt::skip]
static LETTERS: [(u8, [u8; 15]); 5] = [
    (b'A', [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1]),
    (b'C', [1,1,1, 1,0,0, 1,0,0, 1,0,0, 1,1,1]),
    (b'E', [1,1,1, 1,0,0, 1,1,1, 1,0,0, 1,1,1]),
    (b'P', [1,1,1, 1,0,1, 1,1,1, 1,0,0, 1,0,0]),
    (b'S', [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1]),
];

/// Key that starts and restarts a run
const START_HINT: &str = "SPACE";

/// Maps simulation coordinates to buffer pixels
#[derive(Debug, Clone, Copy)]
struct Viewport {
    scale: f32,
    offset_x: f32,
}

impl Viewport {
    fn fit(buf: &PixelBuf, tuning: &Tuning) -> Self {
        let scale = (buf.width() as f32 / tuning.play_width)
            .min(buf.height() as f32 / tuning.play_height);
        let offset_x = (buf.width() as f32 - tuning.play_width * scale) / 2.0;
        Self { scale, offset_x }
    }

    fn x(&self, x: f32) -> i32 {
        (self.offset_x + x * self.scale).round() as i32
    }

    fn y(&self, y: f32) -> i32 {
        (y * self.scale).round() as i32
    }

    fn len(&self, len: f32) -> i32 {
        ((len * self.scale).round() as i32).max(1)
    }
}

/// Draw a full frame for `snapshot`
pub fn draw(buf: &mut PixelBuf, snapshot: &Snapshot, tuning: &Tuning, best: u32) {
    let view = Viewport::fit(buf, tuning);

    buf.fill_rect(0, 0, buf.width() as i32, buf.height() as i32, BACKDROP);
    draw_sky(buf, &view, tuning);
    draw_obstacles(buf, &view, snapshot, tuning);
    draw_ground(buf, &view, tuning);
    draw_avatar(buf, &view, snapshot, tuning);
    draw_number(buf, view.x(tuning.play_width / 2.0), 2, snapshot.score, WHITE);

    match snapshot.phase {
        GamePhase::NotStarted => draw_prompt(buf, &view, tuning),
        GamePhase::GameOver => draw_game_over(buf, &view, tuning, snapshot.score, best),
        GamePhase::Running => {}
    }
}

fn draw_sky(buf: &mut PixelBuf, view: &Viewport, tuning: &Tuning) {
    let x0 = view.x(0.0);
    let w = view.len(tuning.play_width);
    let sky_h = view.len(tuning.play_height).max(1);
    for y in 0..sky_h {
        let t = (y as u32 * 256 / sky_h as u32).min(256) as u16;
        buf.fill_rect(x0, y, w, 1, Rgb::lerp(SKY_TOP, SKY_BOT, t));
    }
}

fn draw_obstacles(buf: &mut PixelBuf, view: &Viewport, snapshot: &Snapshot, tuning: &Tuning) {
    let w = view.len(tuning.pipe_width);
    let bottom = view.y(tuning.play_height);
    for obstacle in &snapshot.obstacles {
        let x = view.x(obstacle.horizontal_position);
        let gap_top = view.y(obstacle.gap_top_height);
        let gap_floor = view.y(obstacle.gap_top_height + tuning.pipe_gap);

        // Lower pipe is drawn down to the bottom and covered by the ground
        buf.fill_rect(x, 0, w, gap_top, PIPE_L);
        buf.fill_rect(x, gap_floor, w, bottom - gap_floor, PIPE_L);
        buf.fill_rect(x + w / 3, 0, (w / 4).max(1), gap_top, PIPE_HI);
        buf.fill_rect(x + w / 3, gap_floor, (w / 4).max(1), bottom - gap_floor, PIPE_HI);
        buf.fill_rect(x, gap_top - 1, w, 1, CAP_DARK);
        buf.fill_rect(x, gap_floor, w, 1, CAP_DARK);
    }
    // Clip anything drawn outside the play area
    let left = view.x(0.0);
    let right = view.x(tuning.play_width);
    buf.fill_rect(0, 0, left, bottom, BACKDROP);
    buf.fill_rect(right, 0, buf.width() as i32 - right, bottom, BACKDROP);
}

fn draw_ground(buf: &mut PixelBuf, view: &Viewport, tuning: &Tuning) {
    let x0 = view.x(0.0);
    let w = view.len(tuning.play_width);
    let top = view.y(tuning.floor_y());
    let bottom = view.y(tuning.play_height);
    buf.fill_rect(x0, top, w, 1, GRASS);
    buf.fill_rect(x0, top + 1, w, bottom - top - 1, DIRT);
}

fn draw_avatar(buf: &mut PixelBuf, view: &Viewport, snapshot: &Snapshot, tuning: &Tuning) {
    let x = view.x(tuning.avatar_x);
    let y = view.y(snapshot.avatar.position);
    let w = view.len(tuning.avatar_width);
    let h = view.len(tuning.avatar_height);

    buf.fill_rect(x, y, w, h, BIRD_Y);
    // Wing flips with the direction of travel
    let wing_y = if snapshot.avatar.velocity < 0.0 { y } else { y + h / 2 };
    buf.fill_rect(x, wing_y, (w / 3).max(1), (h / 2).max(1), BIRD_WING);
    buf.set(x + w - 2, y + 1, BIRD_EYE);
    buf.fill_rect(x + w, y + h / 2, (w / 4).max(1), (h / 3).max(1), BIRD_BEAK);
}

fn glyph(c: u8) -> Option<&'static [u8; 15]> {
    if c.is_ascii_digit() {
        return Some(&DIGITS[(c - b'0') as usize]);
    }
    LETTERS.iter().find(|(l, _)| *l == c).map(|(_, g)| g)
}

fn draw_glyph(buf: &mut PixelBuf, x: i32, y: i32, glyph: &[u8; 15], fg: Rgb) {
    for row in 0..5 {
        for col in 0..3 {
            if glyph[row * 3 + col] == 1 {
                let px = x + col as i32;
                let py = y + row as i32;
                buf.set(px + 1, py + 1, SHADOW);
                buf.set(px, py, fg);
            }
        }
    }
}

/// Draw `text` centred on `cx`; characters without a glyph leave a blank
fn draw_text(buf: &mut PixelBuf, cx: i32, y: i32, text: &str, fg: Rgb) {
    let total_w = text.len() as i32 * 4 - 1;
    let start_x = cx - total_w / 2;
    for (i, c) in text.bytes().enumerate() {
        if let Some(g) = glyph(c) {
            draw_glyph(buf, start_x + i as i32 * 4, y, g, fg);
        }
    }
}

fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, fg: Rgb) {
    draw_text(buf, cx, y, &n.to_string(), fg);
}

fn draw_prompt(buf: &mut PixelBuf, view: &Viewport, tuning: &Tuning) {
    // Marker under the avatar until the first jump
    let x = view.x(tuning.avatar_x);
    let y = view.y(tuning.avatar_start_y + tuning.avatar_height) + 2;
    buf.fill_rect(x, y, view.len(tuning.avatar_width), 1, WHITE);
    draw_text(buf, view.x(tuning.play_width / 2.0), y + 2, START_HINT, WHITE);
}

fn draw_game_over(buf: &mut PixelBuf, view: &Viewport, tuning: &Tuning, score: u32, best: u32) {
    buf.dim();

    let cx = view.x(tuning.play_width / 2.0);
    let cy = view.y(tuning.play_height / 2.0);
    let panel_w = 24;
    let panel_h = 25;
    let px = cx - panel_w / 2;
    let py = cy - panel_h / 2;

    buf.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, SHADOW);
    buf.fill_rect(px, py, panel_w, panel_h, DIRT);
    buf.fill_rect(px + 1, py + 1, panel_w - 2, panel_h - 2, PANEL);

    draw_number(buf, cx, py + 3, score, WHITE);
    draw_number(buf, cx, py + 10, best, BIRD_Y);
    draw_text(buf, cx, py + 17, START_HINT, WHITE);
}
