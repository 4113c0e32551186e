extern crate anyhow;

use crate::arrivals;
use crate::config;
use crate::display;
use crate::projection;

const ROW_HEIGHT: i32 = 16;

const EMBLEM_X: i32 = 8;
const EMBLEM_Y: i32 = 7;
const EMBLEM_RADIUS: i32 = 6;

const GLYPH_X: i32 = 7;
const DESTINATION_X: i32 = 17;
const TEXT_BASELINE: i32 = 10;

// Status tokens ("ARR", "BRD") sit further left than minute counts.
const ETA_MINUTES_X: i32 = 53;
const ETA_STATUS_X: i32 = 48;
const ETA_BASELINE: i32 = 11;

/// Draws one projected frame and presents it.
pub fn draw_frame<S: display::DisplaySurface>(surface: &mut S, frame: &projection::FrameProjection) -> anyhow::Result<()> {
    surface.clear();

    for row in &frame.rows {
        draw_row(surface, row);
    }

    if frame.more_pending {
        let (x, y) = (surface.width() as i32 - 1, surface.height() as i32 - 1);
        surface.draw_pixel(x, y, config::BLUE);
    }

    return surface.swap();
}

fn draw_row<S: display::DisplaySurface>(surface: &mut S, row: &projection::RowProjection) {
    let y_base = row.row_index as i32 * ROW_HEIGHT;

    draw_line_emblem(surface, EMBLEM_X, EMBLEM_Y + y_base, EMBLEM_RADIUS, row.color);
    surface.draw_text(display::Font::Thin, GLYPH_X, TEXT_BASELINE + y_base, config::WHITE,
                      &row.glyph.to_string());

    surface.draw_text(display::Font::Thin, DESTINATION_X, TEXT_BASELINE + y_base, config::GREY,
                      &row.display_text);

    let (eta_x, eta_color) = match row.eta_kind {
        arrivals::EtaKind::Minutes => (ETA_MINUTES_X, config::WHITE),
        arrivals::EtaKind::Status => (ETA_STATUS_X, config::RED),
    };
    surface.draw_text(display::Font::Bold, eta_x, ETA_BASELINE + y_base, eta_color, &row.eta_text);
}

// Filled circle, one horizontal span per scanline.
fn draw_line_emblem<S: display::DisplaySurface>(surface: &mut S, x: i32, y: i32, radius: i32, color: config::Color) {
    for dy in -radius..=radius {
        let half_width = ((radius * radius - dy * dy) as f32).sqrt() as i32;
        surface.draw_line((x - half_width, y + dy), (x + half_width, y + dy), color);
    }
}
