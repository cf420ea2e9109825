/// Month and time-of-day axes.
///
/// Output follows the layout of a d3 v4 axis: a `domain` path first, then
/// one `tick` group per tick value holding a `line` and a `text`, with
/// every position offset by half a pixel so one-pixel strokes land on
/// pixel centres.

use chrono::{DateTime, Utc};

use crate::numeric::js_number;
use crate::render::svg::Element;
use crate::timeline::UtcScale;
use crate::timeline::scale::DEFAULT_TICK_COUNT;

pub const MONTH_FORMAT: &str = "%B";
pub const HOUR_FORMAT: &str = "%-I:%M %p";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orient {
    Bottom,
    Left,
}

impl Orient {
    /// +1 for ticks that point down or right, -1 for up or left.
    fn k(self) -> f64 {
        match self {
            Orient::Bottom => 1.0,
            Orient::Left => -1.0,
        }
    }

    /// Attribute along the tick direction.
    fn cross_attr(self) -> &'static str {
        match self {
            Orient::Bottom => "y",
            Orient::Left => "x",
        }
    }

    fn text_anchor(self) -> &'static str {
        match self {
            Orient::Bottom => "middle",
            Orient::Left => "end",
        }
    }

    fn text_dy(self) -> &'static str {
        match self {
            Orient::Bottom => "0.71em",
            Orient::Left => "0.32em",
        }
    }
}

/// Axis settings. Inner and outer tick size are set together.
#[derive(Debug, Clone, Copy)]
pub struct Axis<'a> {
    pub orient: Orient,
    pub scale: &'a UtcScale,
    pub format: &'a str,
    pub tick_size: f64,
    pub tick_padding: f64,
}

impl<'a> Axis<'a> {
    pub fn new(orient: Orient, scale: &'a UtcScale, format: &'a str) -> Self {
        Axis {
            orient,
            scale,
            format,
            tick_size: 6.0,
            tick_padding: 3.0,
        }
    }

    pub fn tick_size(mut self, size: f64) -> Self {
        self.tick_size = size;
        self
    }

    pub fn tick_padding(mut self, padding: f64) -> Self {
        self.tick_padding = padding;
        self
    }

    fn tick_label(&self, t: DateTime<Utc>) -> String {
        t.format(self.format).to_string()
    }

    fn tick_transform(&self, position: Option<f64>) -> String {
        let p = js_number(position.map(|p| p + 0.5));
        match self.orient {
            Orient::Bottom => format!("translate({},0)", p),
            Orient::Left => format!("translate(0,{})", p),
        }
    }

    fn domain_path(&self) -> String {
        let (r0, r1) = self.scale.range();
        let outer = js_number(Some(self.orient.k() * self.tick_size));
        let r0 = js_number(Some(r0 + 0.5));
        let r1 = js_number(Some(r1 + 0.5));
        match self.orient {
            Orient::Bottom => format!("M{},{}V0.5H{}V{}", r0, outer, r1, outer),
            Orient::Left => format!("M{},{}H0.5V{}H{}", outer, r0, r1, outer),
        }
    }

    /// Draws the axis into `group`, which should be empty.
    pub fn draw(&self, group: &mut Element) {
        let k = self.orient.k();
        let cross = self.orient.cross_attr();
        let spacing = self.tick_size.max(0.0) + self.tick_padding;
        let line_end = format!("{}2", cross);

        group.append(
            Element::new("path")
                .with_attr("class", "domain")
                .with_attr("stroke", "#000")
                .with_attr("d", self.domain_path()),
        );

        for t in self.scale.ticks(DEFAULT_TICK_COUNT) {
            let tick = group.append(
                Element::new("g")
                    .with_attr("class", "tick")
                    .with_attr("opacity", 1)
                    .with_attr("transform", self.tick_transform(self.scale.apply(Some(t)))),
            );
            tick.append(
                Element::new("line")
                    .with_attr("stroke", "#000")
                    .with_attr(&line_end, js_number(Some(k * self.tick_size))),
            );
            let mut text = Element::new("text")
                .with_attr("fill", "#000")
                .with_attr(cross, js_number(Some(k * spacing)))
                .with_attr("dy", self.orient.text_dy());
            text.set_text(self.tick_label(t));
            tick.append(text);
        }

        group.set_attr("fill", "none");
        group.set_attr("font-size", 10);
        group.set_attr("font-family", "sans-serif");
        group.set_attr("text-anchor", self.orient.text_anchor());
    }
}

/// Month axis along the bottom edge, labels inside the plot.
pub fn month_axis(x: &UtcScale, height: f64) -> Element {
    let mut group = Element::new("g")
        .with_attr("class", "axis axis--x")
        .with_attr("transform", format!("translate(0,{})", js_number(Some(height))));
    Axis::new(Orient::Bottom, x, MONTH_FORMAT)
        .tick_size(-height)
        .tick_padding(-10.0)
        .draw(&mut group);

    for tick in group.children_mut().iter_mut().filter(|c| c.has_class("tick")) {
        for text in tick.children_mut().iter_mut().filter(|c| c.tag() == "text") {
            text.set_attr("text-anchor", "start");
            text.set_attr("x", 10);
            text.remove_attr("dy");
        }
    }
    group
}

/// Time-of-day axis along the left edge, grid lines across the plot.
pub fn hour_axis(y: &UtcScale, width: f64) -> Element {
    let mut group = Element::new("g").with_attr("class", "axis axis--y");
    Axis::new(Orient::Left, y, HOUR_FORMAT)
        .tick_size(-width)
        .tick_padding(10.0)
        .draw(&mut group);
    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn year_scale() -> UtcScale {
        let start = Utc.with_ymd_and_hms(2011, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2012, 1, 1, 0, 0, 0).unwrap();
        UtcScale::new(Some((start, end)), (0.0, 900.0))
    }

    #[test]
    fn test_month_axis_structure() {
        let x = year_scale();
        let axis = month_axis(&x, 460.0);
        assert_eq!(axis.attr("class"), Some("axis axis--x"));
        assert_eq!(axis.attr("transform"), Some("translate(0,460)"));
        assert_eq!(axis.attr("text-anchor"), Some("middle"));

        let domain = &axis.children()[0];
        assert_eq!(domain.attr("d"), Some("M0.5,-460V0.5H900.5V-460"));

        let ticks: Vec<_> = axis.children_by_class("tick").collect();
        assert_eq!(ticks.len(), 13);
        assert_eq!(ticks[0].attr("transform"), Some("translate(0.5,0)"));

        let line = &ticks[0].children()[0];
        assert_eq!(line.attr("y2"), Some("-460"));

        let text = &ticks[0].children()[1];
        assert_eq!(text.text(), Some("January"));
        assert_eq!(text.attr("y"), Some("-10"));
        assert_eq!(text.attr("x"), Some("10"));
        assert_eq!(text.attr("text-anchor"), Some("start"));
        assert_eq!(text.attr("dy"), None);
    }

    #[test]
    fn test_hour_axis_structure() {
        let start = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(1970, 1, 2, 0, 0, 0).unwrap();
        let y = UtcScale::new(Some((start, end)), (0.0, 428.0));
        let axis = hour_axis(&y, 890.0);
        assert_eq!(axis.attr("text-anchor"), Some("end"));
        assert_eq!(axis.children()[0].attr("d"), Some("M890,0.5H0.5V428.5H890"));

        let ticks: Vec<_> = axis.children_by_class("tick").collect();
        // Three-hour steps, both ends included.
        assert_eq!(ticks.len(), 9);
        assert_eq!(ticks[1].attr("transform"), Some("translate(0,54.5)"));

        let line = &ticks[0].children()[0];
        assert_eq!(line.attr("x2"), Some("890"));
        let text = &ticks[1].children()[1];
        assert_eq!(text.text(), Some("3:00 AM"));
        assert_eq!(text.attr("x"), Some("-10"));
        assert_eq!(text.attr("dy"), Some("0.32em"));
    }
}
