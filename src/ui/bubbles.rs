use eframe::egui::{self, Align2, Color32, FontId, Id, Pos2, RichText, Sense, Stroke, Ui, Vec2};

use bracket_lens::data::model::{Record, RecordKey};
use bracket_lens::layout::Viewport;
use bracket_lens::state::AppState;

const EMPTY_MESSAGE: &str = "No teams match the current filters.";

/// Radius above which the full team name fits inside a bubble.
const FULL_NAME_RADIUS: f32 = 35.0;

/// Text drawn inside a bubble: the team name when there is room, otherwise
/// initials (or the first three letters of a one-word name).
pub(crate) fn bubble_label(team: &str, radius: f32) -> String {
    if radius > FULL_NAME_RADIUS {
        return team.to_string();
    }
    let words: Vec<&str> = team.split_whitespace().collect();
    let short: String = if words.len() > 1 {
        words.iter().filter_map(|w| w.chars().next()).take(3).collect()
    } else {
        team.chars().take(3).collect()
    };
    short.to_uppercase()
}

fn label_size(radius: f32) -> f32 {
    (radius / 2.5).clamp(9.0, 22.0)
}

// ---------------------------------------------------------------------------
// Bubble canvas
// ---------------------------------------------------------------------------

/// Draw the packed layout and handle bubble drags. Layout coordinates are
/// local to the canvas rect.
pub fn bubble_canvas(ui: &mut Ui, state: &mut AppState) {
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
    let rect = response.rect;
    let origin = rect.min.to_vec2();
    let local = |pos: Pos2| pos - origin;

    state.simulation.resize(Viewport::new(
        rect.width(),
        rect.height(),
        state.config.layout.margin,
    ));

    let text_color = ui.visuals().weak_text_color();
    if state.dataset.is_none() {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "Open a dataset with File → Open…",
            FontId::proportional(16.0),
            text_color,
        );
        return;
    }
    if state.visible_indices.is_empty() {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            EMPTY_MESSAGE,
            FontId::proportional(16.0),
            text_color,
        );
        return;
    }

    // ---- Dragging a bubble pins it under the pointer ----
    let drag_id: Id = response.id.with("dragged_bubble");
    if response.drag_started() {
        let origin_pos = ui
            .input(|i| i.pointer.press_origin())
            .or(response.interact_pointer_pos());
        if let Some(pos) = origin_pos {
            if let Some(key) = state.simulation.hit_test(local(pos)).cloned() {
                state.simulation.pin(&key, local(pos));
                ui.data_mut(|d| d.insert_temp(drag_id, key));
            }
        }
    }
    let dragged: Option<RecordKey> = ui.data(|d| d.get_temp(drag_id));
    if let Some(key) = &dragged {
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                state.simulation.drag_to(key, local(pos));
            }
        }
        if response.drag_stopped() {
            state.simulation.unpin(key);
            ui.data_mut(|d| d.remove::<RecordKey>(drag_id));
        }
    }

    // ---- Circles ----
    let hovered: Option<RecordKey> = dragged.or_else(|| {
        response
            .hover_pos()
            .and_then(|pos| state.simulation.hit_test(local(pos)).cloned())
    });

    for placed in state.simulation.positioned() {
        let Some(record) = state.record_at(&placed) else {
            continue;
        };
        let center = placed.center() + origin;
        let swatch = state.colors.swatch_for(&record.conference);
        let is_hovered = hovered
            .as_ref()
            .is_some_and(|k| k.team == record.team && k.year == record.year);
        let fill = if is_hovered { swatch.hover } else { swatch.fill };
        painter.circle(center, placed.radius, fill, Stroke::new(1.5, swatch.stroke));
        painter.text(
            center,
            Align2::CENTER_CENTER,
            bubble_label(&record.team, placed.radius),
            FontId::proportional(label_size(placed.radius)),
            Color32::WHITE,
        );
    }

    // ---- Tooltip ----
    if let Some(record) = hovered.as_ref().and_then(|key| state.visible_record(key)) {
        response.on_hover_ui_at_pointer(|ui: &mut Ui| tooltip(ui, record));
    }
}

fn tooltip(ui: &mut Ui, record: &Record) {
    ui.label(RichText::new(&record.team).strong());
    egui::Grid::new("bubble_tooltip")
        .num_columns(2)
        .spacing(Vec2::new(8.0, 2.0))
        .show(ui, |ui: &mut Ui| {
            let year = record.year.map_or_else(|| "?".to_string(), |y| y.to_string());
            let seed = record.seed.map_or_else(|| "?".to_string(), |s| s.to_string());
            let rows = [
                ("Year", year),
                ("Seed", seed),
                ("Win %", record.win_pct_display.clone()),
                ("Conference", record.conference.clone()),
                ("Postseason", record.postseason.clone().unwrap_or_else(|| "n/a".to_string())),
            ];
            for (name, value) in rows {
                ui.label(RichText::new(name).weak());
                ui.label(value);
                ui.end_row();
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_bubbles_show_the_full_name() {
        assert_eq!(bubble_label("North Carolina", 40.0), "North Carolina");
    }

    #[test]
    fn small_bubbles_abbreviate() {
        assert_eq!(bubble_label("North Carolina", 20.0), "NC");
        assert_eq!(bubble_label("Texas A&M Corpus Christi", 20.0), "TAC");
        assert_eq!(bubble_label("Gonzaga", 35.0), "GON");
    }

    #[test]
    fn label_size_is_bounded() {
        assert_eq!(label_size(10.0), 9.0);
        assert_eq!(label_size(100.0), 22.0);
        assert!((label_size(40.0) - 16.0).abs() < 1e-6);
    }
}
