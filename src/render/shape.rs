/// Path data for the sun bands.
///
/// Straight segments between consecutive points, written with the
/// coordinate formatting of `numeric::js_number`. Every point is drawn,
/// including ones with an undefined coordinate (written as `NaN`).

use crate::numeric::js_number;

/// One point of an area: shared x, baseline `y0`, topline `y1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaPoint {
    pub x: Option<f64>,
    pub y0: Option<f64>,
    pub y1: Option<f64>,
}

/// Incremental path-data writer.
#[derive(Debug, Default)]
struct PathData {
    d: String,
}

impl PathData {
    fn move_to(&mut self, x: Option<f64>, y: Option<f64>) {
        self.d.push_str(&format!("M{},{}", js_number(x), js_number(y)));
    }

    fn line_to(&mut self, x: Option<f64>, y: Option<f64>) {
        self.d.push_str(&format!("L{},{}", js_number(x), js_number(y)));
    }

    fn close(&mut self) {
        self.d.push('Z');
    }

    fn finish(self) -> Option<String> {
        if self.d.is_empty() { None } else { Some(self.d) }
    }
}

/// Area outline: along the topline left to right, back along the baseline,
/// closed. `None` for no points.
pub fn area_path(points: &[AreaPoint]) -> Option<String> {
    let mut path = PathData::default();
    for (i, p) in points.iter().enumerate() {
        if i == 0 {
            path.move_to(p.x, p.y1);
        } else {
            path.line_to(p.x, p.y1);
        }
    }
    for p in points.iter().rev() {
        path.line_to(p.x, p.y0);
    }
    if !points.is_empty() {
        path.close();
    }
    path.finish()
}

/// Polyline through `points`. A lone point is closed onto itself so it
/// still renders. `None` for no points.
pub fn line_path(points: &[(Option<f64>, Option<f64>)]) -> Option<String> {
    let mut path = PathData::default();
    for (i, &(x, y)) in points.iter().enumerate() {
        if i == 0 {
            path.move_to(x, y);
        } else {
            path.line_to(x, y);
        }
    }
    if points.len() == 1 {
        path.close();
    }
    path.finish()
}
