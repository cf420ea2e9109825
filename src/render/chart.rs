/// One city chart: the plot group and the scales that position its marks.
///
/// Drawing happens in two stages that must run in order:
/// 1. `draw_cover` sets the x-domain from the samples and data-joins one
///    `rect.cover` per sample by index (update recolours, enter appends,
///    exit removes).
/// 2. `draw_sun` replaces every path with the sunset band, the sunrise
///    band and the two boundary lines, then clears axis groups and redraws
///    them if axes are enabled.
///
/// Re-running either stage on the same data leaves the tree unchanged.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::cities::City;
use crate::config::ChartSettings;
use crate::ingest::Fetcher;
use crate::ingest::cover::parse_cover_csv;
use crate::ingest::sun::parse_sun_csv;
use crate::model::{ChartError, CloudSample, SunEvent};
use crate::numeric::js_number;
use crate::render::axis::{hour_axis, month_axis};
use crate::render::color::cover_fill;
use crate::render::shape::{AreaPoint, area_path, line_path};
use crate::render::svg::Element;
use crate::timeline::{AmbientZone, TimeUnit, UtcInterval, UtcScale, shift_to_utc_hours};

pub const COVER_CLASS: &str = "cover";
pub const AREA_CLASS: &str = "sunriseareapath";
pub const LINE_CLASS: &str = "sunriseline";

pub const RECT_WIDTH: f64 = 5.0;
pub const RECT_HEIGHT: f64 = 20.0;

/// Extra depth of the sunset band below the end of the day.
const SUNSET_BAND_OVERHANG: f64 = 20.0;

// ---------------------------------------------------------------------------
// Horizontal scale ownership
// ---------------------------------------------------------------------------

/// The x-scale a chart draws with.
///
/// `Own` gives each chart its own domain. `Shared` reproduces a single
/// scale used by every chart: each cover stage overwrites the domain, and
/// whichever chart loaded last decides where later marks land.
#[derive(Debug, Clone)]
pub enum XScale {
    Own(UtcScale),
    Shared(Arc<Mutex<UtcScale>>),
}

impl XScale {
    pub fn shared(width: f64) -> Arc<Mutex<UtcScale>> {
        Arc::new(Mutex::new(UtcScale::horizontal(width)))
    }

    /// Sets and nices the domain, returning the scale as it now stands.
    fn fit(&mut self, domain: Option<(DateTime<Utc>, DateTime<Utc>)>) -> UtcScale {
        let fit = |scale: &mut UtcScale| {
            scale.set_domain(domain);
            scale.nice();
            scale.clone()
        };
        match self {
            XScale::Own(scale) => fit(scale),
            XScale::Shared(shared) => {
                let mut guard = shared.lock().unwrap_or_else(|e| e.into_inner());
                fit(&mut *guard)
            }
        }
    }

    /// Current state of the scale.
    pub fn snapshot(&self) -> UtcScale {
        match self {
            XScale::Own(scale) => scale.clone(),
            XScale::Shared(shared) => shared.lock().unwrap_or_else(|e| e.into_inner()).clone(),
        }
    }
}

/// Earliest and latest valid instant.
fn time_extent(samples: &[CloudSample]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let mut times = samples.iter().filter_map(|s| s.utc_time);
    let first = times.next()?;
    Some(times.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
}

// ---------------------------------------------------------------------------
// Chart
// ---------------------------------------------------------------------------

pub struct Chart {
    city: City,
    settings: ChartSettings,
    zone: AmbientZone,
    x: XScale,
    y: UtcScale,
    group: Element,
}

impl Chart {
    pub fn new(city: City, settings: ChartSettings, zone: AmbientZone, x: XScale) -> Self {
        let y = UtcScale::vertical(settings.height(), zone);
        let group = Element::new("g").with_attr(
            "transform",
            format!(
                "translate({},{})",
                js_number(Some(settings.margin_left)),
                js_number(Some(settings.margin_top))
            ),
        );
        Chart {
            city,
            settings,
            zone,
            x,
            y,
            group,
        }
    }

    /// A chart with its own x-scale.
    pub fn standalone(city: City, settings: ChartSettings, zone: AmbientZone) -> Self {
        let x = XScale::Own(UtcScale::horizontal(settings.width()));
        Chart::new(city, settings, zone, x)
    }

    pub fn city(&self) -> &City {
        &self.city
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    pub fn group(&self) -> &Element {
        &self.group
    }

    pub fn x_scale(&self) -> UtcScale {
        self.x.snapshot()
    }

    pub fn y_scale(&self) -> &UtcScale {
        &self.y
    }

    /// Number of `rect.cover` marks.
    pub fn cover_count(&self) -> usize {
        self.group.children_by_class(COVER_CLASS).count()
    }

    /// Number of path marks.
    pub fn path_count(&self) -> usize {
        self.group.children_by_tag("path").count()
    }

    // -----------------------------------------------------------------------
    // Stage A: cloud cover
    // -----------------------------------------------------------------------

    /// Fetches and draws the cover data. Returns the sample count.
    pub fn load_cover(&mut self, fetcher: &dyn Fetcher) -> Result<usize, ChartError> {
        let text = fetcher.fetch_text(&self.city.cover_url)?;
        let samples = parse_cover_csv(&text, self.zone)?;
        self.draw_cover(&samples);
        Ok(samples.len())
    }

    pub fn draw_cover(&mut self, samples: &[CloudSample]) {
        let x = self.x.fit(time_extent(samples));
        let y = &self.y;
        let zone = self.zone;

        let mut index = 0;
        self.group.retain_children(|child| {
            if !child.has_class(COVER_CLASS) {
                return true;
            }
            index += 1;
            index <= samples.len()
        });

        let existing = self.cover_count();
        let mut covers = self
            .group
            .children_mut()
            .iter_mut()
            .filter(|c| c.has_class(COVER_CLASS));
        for sample in &samples[..existing] {
            if let Some(rect) = covers.next() {
                rect.set_attr("fill", cover_fill(sample.quantized_cloud));
            }
        }

        for sample in &samples[existing..] {
            let cx = x.apply(sample.local_time);
            let cy = y.apply(shift_to_utc_hours(sample.utc_time, 0, zone));
            self.group.append(
                Element::new("rect")
                    .with_attr("width", js_number(Some(RECT_WIDTH)))
                    .with_attr("height", js_number(Some(RECT_HEIGHT)))
                    .with_attr("x", js_number(cx))
                    .with_attr("y", js_number(cy))
                    .with_attr("class", COVER_CLASS)
                    .with_attr("fill", cover_fill(sample.quantized_cloud)),
            );
        }
    }

    // -----------------------------------------------------------------------
    // Stage B: sunrise / sunset bands
    // -----------------------------------------------------------------------

    /// Fetches and draws the sun data. Returns the event count.
    pub fn load_sun(&mut self, fetcher: &dyn Fetcher) -> Result<usize, ChartError> {
        let text = fetcher.fetch_text(&self.city.sun_url)?;
        let events = parse_sun_csv(&text)?;
        self.draw_sun(&events);
        Ok(events.len())
    }

    pub fn draw_sun(&mut self, events: &[SunEvent]) {
        let x = self.x.snapshot();
        let y = &self.y;
        let zone = self.zone;
        let day = UtcInterval::new(TimeUnit::Day);

        let day_x = |e: &SunEvent| x.apply(e.day.and_then(|d| zone.local_midnight(d)));
        let shifted = |t: Option<DateTime<Utc>>| shift_to_utc_hours(t, 0, zone);

        let set_area: Vec<AreaPoint> = events
            .iter()
            .map(|e| {
                let set = shifted(e.sunset);
                AreaPoint {
                    x: day_x(e),
                    y0: y
                        .apply(set.and_then(|t| day.ceil(t)))
                        .map(|v| v + SUNSET_BAND_OVERHANG),
                    y1: y.apply(set),
                }
            })
            .collect();

        let rise_area: Vec<AreaPoint> = events
            .iter()
            .map(|e| {
                let rise = shifted(e.sunrise);
                AreaPoint {
                    x: day_x(e),
                    y0: y.apply(rise.and_then(|t| day.floor(t))),
                    y1: y.apply(rise),
                }
            })
            .collect();

        let rise_line: Vec<(Option<f64>, Option<f64>)> = events
            .iter()
            .map(|e| (day_x(e), y.apply(shifted(e.sunrise))))
            .collect();

        let set_line: Vec<(Option<f64>, Option<f64>)> = events
            .iter()
            .map(|e| (day_x(e), y.apply(shifted(e.sunset))))
            .collect();

        self.group.retain_children(|c| c.tag() != "path");
        for (d, class) in [
            (area_path(&set_area), AREA_CLASS),
            (area_path(&rise_area), AREA_CLASS),
            (line_path(&rise_line), LINE_CLASS),
            (line_path(&set_line), LINE_CLASS),
        ] {
            let mut path = Element::new("path");
            if let Some(d) = d {
                path.set_attr("d", d);
            }
            path.set_attr("class", class);
            self.group.append(path);
        }

        self.group.retain_children(|c| c.tag() != "g");
        if self.settings.axes {
            self.group.append(month_axis(&x, self.settings.height()));
            self.group.append(hour_axis(&self.y, self.settings.width()));
        }
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    /// The container `<svg>` holding the plot group.
    pub fn to_element(&self) -> Element {
        let mut svg = Element::new("svg")
            .with_attr("xmlns", "http://www.w3.org/2000/svg")
            .with_attr("id", &self.city.container_id)
            .with_attr("width", js_number(Some(self.settings.outer_width)))
            .with_attr("height", js_number(Some(self.settings.outer_height)));
        svg.append(self.group.clone());
        svg
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cities::default_cities;
    use crate::ingest::cover::process_cover_row;
    use crate::ingest::sun::process_sun_row;

    fn pacific() -> AmbientZone {
        AmbientZone::fixed_minutes(-8 * 60).unwrap()
    }

    fn chart(settings: ChartSettings) -> Chart {
        Chart::standalone(default_cities()[0].clone(), settings, pacific())
    }

    fn samples(rows: &[(&str, &str)]) -> Vec<CloudSample> {
        rows.iter()
            .map(|(date, cover)| process_cover_row(date, cover, pacific()))
            .collect()
    }

    fn year_samples() -> Vec<CloudSample> {
        samples(&[
            ("01-01-2011-00:00", "0"),
            ("01-02-2011-14:30", "37"),
            ("06-15-2011-12:00", "90"),
            ("12-31-2011-23:00", "60"),
        ])
    }

    #[test]
    fn test_group_translated_by_margins() {
        let c = chart(ChartSettings::default());
        assert_eq!(c.group().attr("transform"), Some("translate(70,20)"));
    }

    #[test]
    fn test_cover_rect_attributes() {
        let mut c = chart(ChartSettings::default());
        c.draw_cover(&year_samples());
        assert_eq!(c.cover_count(), 4);

        let rect = &c.group().children()[1];
        let names: Vec<&str> = rect.attrs().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["width", "height", "x", "y", "class", "fill"]);
        assert_eq!(rect.attr("width"), Some("5"));
        assert_eq!(rect.attr("height"), Some("20"));
        assert_eq!(rect.attr("fill"), Some("rgb(151, 151, 151)"));
        // 14:30 UTC sits at 14.5/24 of the 428px day.
        assert_eq!(rect.attr("y"), Some("259"));
    }

    #[test]
    fn test_x_domain_is_niced_to_months() {
        let mut c = chart(ChartSettings::default());
        c.draw_cover(&year_samples());
        let (d0, d1) = c.x_scale().domain().unwrap();
        assert_eq!(d0.to_rfc3339(), "2011-01-01T00:00:00+00:00");
        assert_eq!(d1.to_rfc3339(), "2012-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_invalid_sample_renders_nan() {
        let mut c = chart(ChartSettings::default());
        let mut data = year_samples();
        data.push(process_cover_row("bogus", "40", pacific()));
        c.draw_cover(&data);
        let rect = c.group().children().last().unwrap();
        assert_eq!(rect.attr("x"), Some("NaN"));
        assert_eq!(rect.attr("y"), Some("NaN"));
    }

    #[test]
    fn test_data_join_update_and_exit() {
        let mut c = chart(ChartSettings::default());
        c.draw_cover(&year_samples());
        let first_x = c.group().children()[0].attr("x").map(str::to_string);

        let fewer = samples(&[("01-01-2011-00:00", "100"), ("01-02-2011-14:30", "0")]);
        c.draw_cover(&fewer);
        assert_eq!(c.cover_count(), 2);
        let first = &c.group().children()[0];
        // Update changes only the fill.
        assert_eq!(first.attr("fill"), Some("rgb(0, 0, 0)"));
        assert_eq!(first.attr("x").map(str::to_string), first_x);
    }

    #[test]
    fn test_redraw_is_idempotent() {
        let mut c = chart(ChartSettings::default());
        let sun = vec![process_sun_row("01-02-2011", "07:45", "17:10")];
        c.draw_cover(&year_samples());
        c.draw_sun(&sun);
        let first = c.group().to_markup();

        c.draw_cover(&year_samples());
        c.draw_sun(&sun);
        assert_eq!(c.group().to_markup(), first);
        assert_eq!(c.path_count(), 4);
    }

    #[test]
    fn test_sun_paths_in_order() {
        let mut c = chart(ChartSettings::default());
        c.draw_cover(&year_samples());
        c.draw_sun(&[
            process_sun_row("01-01-2011", "15:52", "00:39"),
            process_sun_row("01-02-2011", "15:52", "00:40"),
        ]);
        let paths: Vec<&Element> = c.group().children_by_tag("path").collect();
        let classes: Vec<Option<&str>> = paths.iter().map(|p| p.attr("class")).collect();
        assert_eq!(
            classes,
            vec![
                Some(AREA_CLASS),
                Some(AREA_CLASS),
                Some(LINE_CLASS),
                Some(LINE_CLASS)
            ]
        );
        // Lines are open polylines; areas are closed.
        assert!(paths[0].attr("d").unwrap().ends_with('Z'));
        assert!(!paths[2].attr("d").unwrap().ends_with('Z'));
        // d is written before class.
        assert_eq!(paths[0].attrs()[0].0, "d");
    }

    #[test]
    fn test_empty_sun_data_gives_paths_without_data() {
        let mut c = chart(ChartSettings::default());
        c.draw_cover(&year_samples());
        c.draw_sun(&[]);
        assert_eq!(c.path_count(), 4);
        assert!(c.group().children_by_tag("path").all(|p| p.attr("d").is_none()));
    }

    #[test]
    fn test_axes_follow_flag() {
        let mut off = chart(ChartSettings::default());
        off.draw_cover(&year_samples());
        off.draw_sun(&[]);
        assert_eq!(off.group().children_by_tag("g").count(), 0);

        let mut on = chart(ChartSettings {
            axes: true,
            ..ChartSettings::default()
        });
        on.draw_cover(&year_samples());
        on.draw_sun(&[]);
        on.draw_sun(&[]);
        let axes: Vec<&Element> = on.group().children_by_tag("g").collect();
        assert_eq!(axes.len(), 2);
        assert!(axes[0].has_class("axis--x"));
        assert!(axes[1].has_class("axis--y"));
    }

    #[test]
    fn test_shared_scale_last_writer_wins() {
        let settings = ChartSettings::default();
        let shared = XScale::shared(settings.width());
        let cities = default_cities();
        let mut a = Chart::new(
            cities[0].clone(),
            settings.clone(),
            pacific(),
            XScale::Shared(shared.clone()),
        );
        let mut b = Chart::new(
            cities[1].clone(),
            settings,
            pacific(),
            XScale::Shared(shared.clone()),
        );

        a.draw_cover(&year_samples());
        b.draw_cover(&samples(&[("03-01-2011-00:00", "0"), ("03-20-2011-00:00", "0")]));
        assert_eq!(a.x_scale(), b.x_scale());
        assert_eq!(a.x_scale().domain().unwrap().0.to_rfc3339(), "2011-03-01T00:00:00+00:00");
    }

    #[test]
    fn test_svg_container() {
        let c = chart(ChartSettings::default());
        let svg = c.to_element();
        assert_eq!(svg.attr("id"), Some("pdxViz"));
        assert_eq!(svg.attr("width"), Some("960"));
        assert_eq!(svg.attr("height"), Some("500"));
        assert_eq!(svg.children().len(), 1);
    }
}
