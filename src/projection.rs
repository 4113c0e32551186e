use crate::arrivals;
use crate::config;

// Destination width left over next to the countdown.
pub const MINUTES_MAX_LEN: usize = 7;
pub const STATUS_MAX_LEN: usize = 6;

/// Everything the renderer needs to draw one row. Positions are left to the
/// adapter; this only fixes the content and the colors.
#[derive(Debug, Clone, PartialEq)]
pub struct RowProjection {
    pub row_index: usize,
    pub glyph: char,
    pub color: config::Color,
    pub display_text: String,
    pub eta_text: String,
    pub eta_kind: arrivals::EtaKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameProjection {
    pub rows: Vec<RowProjection>,
    pub more_pending: bool,
}

pub fn max_display_len(eta_kind: arrivals::EtaKind) -> usize {
    return match eta_kind {
        arrivals::EtaKind::Minutes => MINUTES_MAX_LEN,
        arrivals::EtaKind::Status => STATUS_MAX_LEN,
    };
}

pub fn project_row(tables: &config::DisplayTables, row_index: usize, arrival: &arrivals::Arrival) -> RowProjection {
    let eta_kind = arrival.eta_kind();
    let display_text: String = tables.short_name(arrival.destination())
        .chars()
        .take(max_display_len(eta_kind))
        .collect();

    return RowProjection {
        row_index: row_index,
        glyph: arrival.line_code().chars().next().unwrap_or('?'),
        color: tables.line_color(arrival.line_code()),
        display_text: display_text,
        eta_text: arrival.eta().to_string(),
        eta_kind: eta_kind,
    };
}

// `total` is the length of the whole list, not of the pair.
pub fn project_frame(tables: &config::DisplayTables, pair: &[&arrivals::Arrival], total: usize) -> FrameProjection {
    return FrameProjection {
        rows: pair.iter().enumerate().map(|(i, a)| project_row(tables, i, a)).collect(),
        more_pending: total > 2,
    };
}
