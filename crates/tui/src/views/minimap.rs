use crate::theme::{Theme, role_color};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use sessionlens_core::Role;
use sessionlens_viewport::Minimap;

/// Columns taken by the minimap: one for the canvas, one for the indicator.
pub const MINIMAP_WIDTH: u16 = 2;

/// Draw the minimap canvas and viewport indicator into `area`.
///
/// Each terminal row shows `pixel_ratio` canvas rows: with the default ratio
/// of two, the upper and lower halves of a cell carry separate roles.
pub fn render(buf: &mut Buffer, area: Rect, minimap: &Minimap) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let canvas = minimap.canvas();
    let ratio = minimap.pixel_ratio().max(1) as usize;
    let indicator = minimap.indicator();

    for row in 0..area.height {
        let y = area.y + row;
        let base = row as usize * ratio;
        let upper = canvas.get(base).copied().flatten();
        let lower = canvas.get(base + ratio - 1).copied().flatten();
        paint_cell(buf, area.x, y, upper, lower);

        if area.width > 1 {
            let top = f64::from(row);
            let covered = indicator.is_some_and(|ind| {
                top + 1.0 > ind.top && top < ind.top + ind.height.max(1.0)
            });
            let cell = &mut buf[(area.x + 1, y)];
            if covered {
                cell.set_symbol("┃").set_fg(Theme::MINIMAP_INDICATOR);
            } else {
                cell.set_symbol(" ");
            }
            cell.set_bg(Theme::MINIMAP_BG);
        }
    }
}

fn paint_cell(buf: &mut Buffer, x: u16, y: u16, upper: Option<Role>, lower: Option<Role>) {
    let cell = &mut buf[(x, y)];
    match (upper, lower) {
        (None, None) => {
            cell.set_symbol(" ").set_bg(Theme::MINIMAP_BG);
        }
        (Some(upper), None) => {
            cell.set_symbol("▀")
                .set_fg(role_color(upper))
                .set_bg(Theme::MINIMAP_BG);
        }
        (None, Some(lower)) => {
            cell.set_symbol("▄")
                .set_fg(role_color(lower))
                .set_bg(Theme::MINIMAP_BG);
        }
        (Some(upper), Some(lower)) => {
            cell.set_symbol("▀")
                .set_fg(role_color(upper))
                .set_bg(role_color(lower));
        }
    }
}
