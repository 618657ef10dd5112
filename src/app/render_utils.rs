use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};

pub(super) const SELECTED_GOLD: Color32 = Color32::from_rgb(245, 206, 93);
const HOVER_ORANGE: Color32 = Color32::from_rgb(255, 164, 101);
const SEARCH_BLUE: Color32 = Color32::from_rgb(103, 196, 255);

/// Highlight state of a marker, strongest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum MarkerTone {
    Selected,
    Hovered,
    SearchHit,
    SearchMiss,
    Plain,
}

impl MarkerTone {
    pub(super) fn of(selected: bool, hovered: bool, search_hit: bool, searching: bool) -> Self {
        match (selected, hovered, search_hit, searching) {
            (true, ..) => Self::Selected,
            (_, true, ..) => Self::Hovered,
            (_, _, true, _) => Self::SearchHit,
            (_, _, _, true) => Self::SearchMiss,
            _ => Self::Plain,
        }
    }

    /// Tints a marker's position colour for this state.
    pub(super) fn fill(self, base: Color32) -> Color32 {
        match self {
            Self::Selected => mix(base, SELECTED_GOLD, 0.65),
            Self::Hovered => mix(base, HOVER_ORANGE, 0.45),
            Self::SearchHit => mix(base, SEARCH_BLUE, 0.68),
            Self::SearchMiss => with_alpha(mix(base, Color32::BLACK, 0.62), 0.66),
            Self::Plain => base,
        }
    }
}

/// Straight per-channel interpolation in unmultiplied sRGB.
fn mix(from: Color32, to: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let [r0, g0, b0, a0] = from.to_srgba_unmultiplied();
    let [r1, g1, b1, a1] = to.to_srgba_unmultiplied();
    let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * amount).round() as u8;
    Color32::from_rgba_unmultiplied(
        channel(r0, r1),
        channel(g0, g1),
        channel(b0, b1),
        channel(a0, a1),
    )
}

pub(super) fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Color32::from_rgba_unmultiplied(r, g, b, (a as f32 * alpha.clamp(0.0, 1.0)) as u8)
}

/// Grid backdrop; `padding` marks the band markers are mapped away from.
pub(super) fn draw_background(painter: &Painter, rect: Rect, padding: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = 56.0;
    let grid = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left() + step;
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], grid);
        x += step;
    }

    let mut y = rect.top() + step;
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], grid);
        y += step;
    }

    let inner = rect.shrink(padding.max(0.0));
    if inner.is_positive() {
        painter.rect_stroke(
            inner,
            4.0,
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(90, 104, 120, 60)),
            eframe::egui::StrokeKind::Inside,
        );
    }
}

/// Cubic ease-out on `t` in `[0, 1]`.
pub(super) fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Colour for a marker by its normalized canvas position, so neighbouring
/// items share a hue.
pub(super) fn position_color(normalized_x: f32, normalized_y: f32) -> Color32 {
    let x = normalized_x.clamp(0.0, 1.0);
    let y = normalized_y.clamp(0.0, 1.0);
    let r = (70.0 + (150.0 * x)) as u8;
    let g = (120.0 + (80.0 * y)) as u8;
    let b = (215.0 - (120.0 * x)) as u8;
    Color32::from_rgb(r, g, b)
}
