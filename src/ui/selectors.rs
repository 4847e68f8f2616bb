use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Ui, pos2, vec2};

use bracket_lens::data::filter::FilterEvent;
use bracket_lens::select::angular::{MAX_ANGLE, MIN_ANGLE};
use bracket_lens::select::{
    AngularRangeSelector, ArcGeometry, LinearRangeSelector, SeedSelector, YearSelector,
};

const STRIP_HEIGHT: f32 = 56.0;
const BRUSH_HEIGHT: f32 = 64.0;
/// Space under the bars kept for tick labels.
const AXIS_HEIGHT: f32 = 14.0;

fn to_pos((x, y): (f64, f64)) -> Pos2 {
    pos2(x as f32, y as f32)
}

fn to_point(pos: Pos2) -> (f64, f64) {
    (pos.x as f64, pos.y as f64)
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

struct Palette {
    bar: Color32,
    dim: Color32,
    active: Color32,
    text: Color32,
}

impl Palette {
    fn of(ui: &Ui) -> Self {
        let visuals = ui.visuals();
        Palette {
            bar: visuals.widgets.inactive.bg_fill,
            dim: visuals.widgets.inactive.bg_fill.gamma_multiply(0.4),
            active: visuals.selection.bg_fill,
            text: visuals.weak_text_color(),
        }
    }
}

// ---------------------------------------------------------------------------
// Year strip
// ---------------------------------------------------------------------------

/// One slot per season with a bar for the number of visible teams.
pub fn year_strip(ui: &mut Ui, sel: &mut YearSelector) -> Option<FilterEvent> {
    let years = sel.years().to_vec();
    if years.is_empty() {
        ui.label("No seasons in data.");
        return None;
    }
    let colors = Palette::of(ui);
    let (response, painter) =
        ui.allocate_painter(vec2(ui.available_width(), STRIP_HEIGHT), Sense::click());
    let rect = response.rect;
    let slot = rect.width() / years.len() as f32;
    let bars_bottom = rect.bottom() - AXIS_HEIGHT;
    let max = sel.max_count().max(1) as f32;

    for (i, &year) in years.iter().enumerate() {
        let x0 = rect.left() + slot * i as f32;
        let slot_rect = Rect::from_min_max(
            pos2(x0 + 1.0, rect.top()),
            pos2(x0 + slot - 1.0, bars_bottom),
        );
        if sel.is_blocked(year) {
            let stroke = Stroke::new(1.0, colors.text);
            painter.line_segment([slot_rect.left_top(), slot_rect.right_bottom()], stroke);
            painter.line_segment([slot_rect.right_top(), slot_rect.left_bottom()], stroke);
        } else {
            let height = slot_rect.height() * sel.count(year) as f32 / max;
            let bar = Rect::from_min_max(
                pos2(slot_rect.left(), bars_bottom - height),
                slot_rect.right_bottom(),
            );
            let fill = if sel.selected() == Some(year) { colors.active } else { colors.bar };
            painter.rect_filled(bar, 1.0, fill);
        }
        if slot >= 22.0 || i == 0 || i + 1 == years.len() {
            painter.text(
                pos2(x0 + slot * 0.5, bars_bottom + 1.0),
                Align2::CENTER_TOP,
                format!("'{:02}", year.rem_euclid(100)),
                FontId::proportional(10.0),
                colors.text,
            );
        }
    }

    let slot_of = |pos: Pos2| {
        let index = ((pos.x - rect.left()) / slot).floor().max(0.0) as usize;
        years[index.min(years.len() - 1)]
    };
    let event = if response.clicked() {
        response.interact_pointer_pos().and_then(|pos| sel.click(slot_of(pos)))
    } else {
        None
    };
    if let Some(pos) = response.hover_pos() {
        let year = slot_of(pos);
        let text = if sel.is_blocked(year) {
            format!("{year}: no tournament")
        } else {
            format!("{year}: {} teams", sel.count(year))
        };
        response.on_hover_text_at_pointer(text);
    }
    event
}

// ---------------------------------------------------------------------------
// Seed grid
// ---------------------------------------------------------------------------

pub fn seed_grid(ui: &mut Ui, sel: &mut SeedSelector) -> Option<FilterEvent> {
    let mut event = None;
    egui::Grid::new("seed_grid")
        .spacing([4.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            for seed in SeedSelector::seeds() {
                if ui
                    .selectable_label(sel.is_selected(seed), format!("{seed:>2}"))
                    .clicked()
                {
                    event = sel.toggle(seed);
                }
                if seed % 8 == 0 {
                    ui.end_row();
                }
            }
        });
    event
}

// ---------------------------------------------------------------------------
// Linear brush over a histogram
// ---------------------------------------------------------------------------

pub fn linear_brush(ui: &mut Ui, sel: &mut LinearRangeSelector) -> Option<FilterEvent> {
    let colors = Palette::of(ui);
    let (response, painter) =
        ui.allocate_painter(vec2(ui.available_width(), BRUSH_HEIGHT), Sense::drag());
    let rect = response.rect;
    sel.set_pixel_range((0.0, rect.width() as f64));

    let local = |pos: Pos2| (pos.x - rect.left()) as f64;
    let mut event = None;
    if let Some(pos) = response.interact_pointer_pos() {
        if response.drag_started() {
            sel.drag_start(local(pos));
        }
        if response.dragged() {
            event = sel.drag_move(local(pos)).or(event);
        }
    }
    if response.drag_stopped() {
        event = sel.drag_end().or(event);
    }

    let bars_bottom = rect.bottom() - AXIS_HEIGHT;
    let max = sel.histogram().max_count().max(1) as f32;
    let selection = sel.selection();
    for bin in &sel.histogram().bins {
        let x0 = rect.left() + sel.scale().apply(bin.x0) as f32;
        let x1 = rect.left() + sel.scale().apply(bin.x1) as f32;
        let height = (bars_bottom - rect.top()) * bin.count as f32 / max;
        let mid = bin.midpoint();
        let inside = selection.map_or(true, |(low, high)| low <= mid && mid <= high);
        painter.rect_filled(
            Rect::from_min_max(pos2(x0 + 0.5, bars_bottom - height), pos2(x1 - 0.5, bars_bottom)),
            0.0,
            if inside { colors.bar } else { colors.dim },
        );
    }

    if let Some((a, b)) = sel.selection_pixels() {
        let brush = Rect::from_min_max(
            pos2(rect.left() + a as f32, rect.top()),
            pos2(rect.left() + b as f32, bars_bottom),
        );
        let stroke_width = if sel.is_dragging() { 2.0 } else { 1.0 };
        painter.rect_filled(brush, 0.0, colors.active.gamma_multiply(0.25));
        painter.rect_stroke(
            brush,
            0.0,
            Stroke::new(stroke_width, colors.active),
            egui::StrokeKind::Inside,
        );
    }

    painter.line_segment(
        [pos2(rect.left(), bars_bottom), pos2(rect.right(), bars_bottom)],
        Stroke::new(1.0, colors.text),
    );
    for tick in sel.scale().ticks(5) {
        let x = rect.left() + sel.scale().apply(tick) as f32;
        painter.line_segment(
            [pos2(x, bars_bottom), pos2(x, bars_bottom + 3.0)],
            Stroke::new(1.0, colors.text),
        );
        painter.text(
            pos2(x, bars_bottom + 3.0),
            Align2::CENTER_TOP,
            format_tick(tick),
            FontId::proportional(9.0),
            colors.text,
        );
    }
    event
}

// ---------------------------------------------------------------------------
// Angular selector: histogram wrapped around a half circle
// ---------------------------------------------------------------------------

pub fn angular_arc(ui: &mut Ui, sel: &mut AngularRangeSelector) -> Option<FilterEvent> {
    let colors = Palette::of(ui);
    let width = ui.available_width();
    let height = (width * 0.5).clamp(80.0, 180.0) + 18.0;
    let (response, painter) = ui.allocate_painter(vec2(width, height), Sense::drag());
    let rect = response.rect;

    let center = pos2(rect.center().x, rect.bottom() - 16.0);
    let outer = (rect.width() * 0.5 - 8.0).min(rect.height() - 24.0).max(24.0);
    let radius = outer * 0.6;
    let depth = outer - radius;
    sel.set_geometry(ArcGeometry {
        center: to_point(center),
        radius: radius as f64,
        tolerance: (depth as f64).max(10.0),
    });

    let mut event = None;
    if let Some(pos) = response.interact_pointer_pos() {
        if response.drag_started() {
            sel.drag_start(to_point(pos));
        }
        if response.dragged() {
            event = sel.drag_move(to_point(pos)).or(event);
        }
    }
    if response.drag_stopped() {
        event = sel.drag_end().or(event);
    }

    let geometry = *sel.geometry();
    let max = sel.histogram().max_count().max(1) as f64;
    let selection = sel.selection();
    for bin in sel.histogram().bins.iter().filter(|b| b.count > 0) {
        let a0 = sel.scale().apply(bin.x0);
        let a1 = sel.scale().apply(bin.x1);
        let outer_r = geometry.radius + depth as f64 * bin.count as f64 / max;
        let mid = bin.midpoint();
        let inside = selection.map_or(true, |(low, high)| low <= mid && mid <= high);
        let points = vec![
            to_pos(geometry.point_at(a0, geometry.radius)),
            to_pos(geometry.point_at(a0, outer_r)),
            to_pos(geometry.point_at(a1, outer_r)),
            to_pos(geometry.point_at(a1, geometry.radius)),
        ];
        painter.add(Shape::convex_polygon(
            points,
            if inside { colors.bar } else { colors.dim },
            Stroke::NONE,
        ));
    }

    let arc: Vec<Pos2> = geometry
        .arc_points(MIN_ANGLE, MAX_ANGLE, 48)
        .into_iter()
        .map(to_pos)
        .collect();
    painter.add(Shape::line(arc, Stroke::new(1.0, colors.text)));

    if let Some((from, to)) = sel.selection_angles() {
        let arc: Vec<Pos2> = geometry.arc_points(from, to, 24).into_iter().map(to_pos).collect();
        painter.add(Shape::line(arc, Stroke::new(4.0, colors.active)));
    }

    let (d0, d1) = sel.scale().domain();
    for (angle, value, align) in [
        (MIN_ANGLE, d0, Align2::RIGHT_CENTER),
        (MAX_ANGLE, d1, Align2::LEFT_CENTER),
    ] {
        painter.text(
            to_pos(geometry.point_at(angle, geometry.radius)),
            align,
            format_tick(value),
            FontId::proportional(9.0),
            colors.text,
        );
    }
    if let Some((low, high)) = selection {
        painter.text(
            center,
            Align2::CENTER_BOTTOM,
            format!("{low:.1} – {high:.1}"),
            FontId::proportional(11.0),
            colors.active,
        );
    }
    event
}
