//! Chart Component
//!
//! "Visits per Hour" line chart drawn on an HTML5 canvas.

use chrono::{Datelike, Timelike};
use js_sys::{Date, Object, Reflect};
use leptos::*;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use visits_dashboard::{
    curve_controls, AxisLabeler, ChartConfig, ChartLayout, ChartModel, ChartRenderer, ChartView,
    Margins, ResolvedTime, SurfaceError, Timestamp, TrafficPoint, Widget,
    INVALID_DATE,
};

use crate::components::show_degraded;
use crate::leaflet::js_error;

/// Upper bound on drawn x labels; the rest are skipped evenly
const MAX_X_LABELS: usize = 12;

const GRID_COLOR: &str = "#e5e7eb";
const TEXT_COLOR: &str = "#6b7280";

/// Traffic chart card
#[component]
pub fn TrafficChart(config: ChartConfig, points: Vec<TrafficPoint>) -> impl IntoView {
    let container_ref = create_node_ref::<html::Div>();
    let canvas_ref = create_node_ref::<html::Canvas>();
    let chart = store_value(None::<ChartView<CanvasRenderer>>);

    // Draw once; the series never changes after page load
    create_effect(move |_| {
        let (Some(container), Some(canvas)) = (container_ref.get(), canvas_ref.get()) else {
            return;
        };
        if chart.with_value(Option::is_some) {
            return;
        }

        let canvas: &HtmlCanvasElement = &canvas;
        let renderer = CanvasRenderer::new(canvas.clone());
        match ChartView::initialize(renderer, &points, &config, &BrowserLabeler::from_navigator()) {
            Ok(view) => {
                tracing::debug!(points = view.model().len(), "Chart drawn");
                chart.set_value(Some(view));
            }
            Err(e) => show_degraded(&container, Widget::Chart, &e),
        }
    });

    view! {
        <div class="card shadow-sm">
            <div class="card-header">
                <h5 class="mb-0">"Traffic"</h5>
            </div>
            <div node_ref=container_ref class="card-body">
                <canvas
                    node_ref=canvas_ref
                    id="trafficChart"
                    width="800"
                    height="320"
                    class="w-100"
                />
            </div>
        </div>
    }
}

/// Draws a [`ChartModel`] with the 2D canvas API
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas }
    }

    fn context(&self) -> Result<CanvasRenderingContext2d, SurfaceError> {
        self.canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or_else(|| SurfaceError::new("2d canvas context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::new("unexpected canvas context type"))
    }
}

impl ChartRenderer for CanvasRenderer {
    fn render(&mut self, model: &ChartModel) -> Result<(), SurfaceError> {
        let ctx = self.context()?;
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;
        let layout = ChartLayout::new(model, width, height, Margins::default());

        ctx.clear_rect(0.0, 0.0, width, height);
        ctx.set_font("12px sans-serif");

        // Horizontal grid on integer ticks
        ctx.set_line_width(1.0);
        ctx.set_text_align("right");
        for tick in &model.y_axis.ticks {
            let y = layout.y_at(*tick as f64);
            ctx.set_stroke_style(&GRID_COLOR.into());
            ctx.begin_path();
            ctx.move_to(layout.left, y);
            ctx.line_to(layout.right(), y);
            ctx.stroke();

            ctx.set_fill_style(&TEXT_COLOR.into());
            ctx.fill_text(&tick.to_string(), layout.left - 8.0, y + 4.0).map_err(js_error)?;
        }

        if model.is_empty() {
            ctx.set_text_align("center");
            ctx.set_font("16px sans-serif");
            ctx.fill_text("No traffic recorded yet", width / 2.0, height / 2.0)
                .map_err(js_error)?;
            return Ok(());
        }

        let points = layout.points(&model.values);
        let controls = curve_controls(&points, model.style.tension);

        if model.style.fill {
            trace_series(&ctx, &points, &controls);
            if let (Some(first), Some(last)) = (points.first(), points.last()) {
                ctx.line_to(last.0, layout.baseline());
                ctx.line_to(first.0, layout.baseline());
            }
            ctx.close_path();
            ctx.set_fill_style(&model.style.fill_color.as_str().into());
            ctx.fill();
        }

        trace_series(&ctx, &points, &controls);
        ctx.set_stroke_style(&model.style.border_color.as_str().into());
        ctx.set_line_width(model.style.border_width);
        ctx.stroke();

        ctx.set_fill_style(&model.style.border_color.as_str().into());
        for (x, y) in &points {
            ctx.begin_path();
            ctx.arc(*x, *y, 3.0, 0.0, std::f64::consts::PI * 2.0).map_err(js_error)?;
            ctx.fill();
        }

        // Rotated x labels hanging below the baseline
        ctx.set_fill_style(&TEXT_COLOR.into());
        ctx.set_font("12px sans-serif");
        ctx.set_text_align("right");
        let angle = -model.x_label_rotation.to_radians();
        for (i, label) in model.labels.iter().enumerate().step_by(layout.label_stride(MAX_X_LABELS)) {
            ctx.save();
            let drawn = ctx
                .translate(layout.x_at(i), layout.baseline() + 12.0)
                .and_then(|_| ctx.rotate(angle))
                .and_then(|_| ctx.fill_text(label, 0.0, 0.0));
            ctx.restore();
            drawn.map_err(js_error)?;
        }

        if model.show_legend {
            ctx.set_text_align("left");
            ctx.set_fill_style(&model.style.border_color.as_str().into());
            ctx.fill_text(&model.series_label, layout.left, layout.top - 6.0)
                .map_err(js_error)?;
        }

        Ok(())
    }
}

fn trace_series(
    ctx: &CanvasRenderingContext2d,
    points: &[(f64, f64)],
    controls: &[((f64, f64), (f64, f64))],
) {
    let Some(first) = points.first() else {
        return;
    };

    ctx.begin_path();
    ctx.move_to(first.0, first.1);
    for (i, (c1, c2)) in controls.iter().enumerate() {
        let (x, y) = points[i + 1];
        ctx.bezier_curve_to(c1.0, c1.1, c2.0, c2.1, x, y);
    }
}

/// Formats x labels with the browser's locale: the locale's date, a space,
/// then hour and minute
pub struct BrowserLabeler {
    locale: String,
}

impl BrowserLabeler {
    pub fn new(locale: impl Into<String>) -> Self {
        Self { locale: locale.into() }
    }

    pub fn from_navigator() -> Self {
        let locale = web_sys::window()
            .and_then(|w| w.navigator().language())
            .unwrap_or_else(|| "en-US".to_string());
        Self::new(locale)
    }

    fn time_options() -> Object {
        let options = Object::new();
        for (key, value) in [("hour", "2-digit"), ("minute", "2-digit")] {
            if let Err(e) = Reflect::set(&options, &JsValue::from_str(key), &JsValue::from_str(value)) {
                tracing::debug!("Could not set time option {}: {:?}", key, e);
            }
        }
        options
    }
}

impl AxisLabeler for BrowserLabeler {
    fn label(&self, timestamp: &Timestamp) -> String {
        let date = match timestamp.resolve() {
            Some(ResolvedTime::Instant(utc)) => {
                Date::new(&JsValue::from_f64(utc.timestamp_millis() as f64))
            }
            // local wall-clock time, as the browser would read it
            Some(ResolvedTime::Wall(naive)) => Date::new_with_year_month_day_hr_min_sec(
                naive.year() as u32,
                naive.month0() as i32,
                naive.day() as i32,
                naive.hour() as i32,
                naive.minute() as i32,
                naive.second() as i32,
            ),
            None => return INVALID_DATE.to_string(),
        };

        if date.get_time().is_nan() {
            return INVALID_DATE.to_string();
        }
        let day = String::from(date.to_locale_date_string(&self.locale, &JsValue::UNDEFINED));
        let time = String::from(date.to_locale_time_string_with_options(&self.locale, &Self::time_options()));
        format!("{} {}", day, time)
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_label_joins_date_and_time() {
        let labeler = BrowserLabeler::new("en-US");
        let label = labeler.label(&Timestamp::from("2024-03-01 13:00:00"));

        assert!(label.starts_with("3/1/2024 01:00"), "{}", label);
        assert!(label.ends_with("PM"), "{}", label);
        assert!(!label.contains(','), "{}", label);
    }

    #[wasm_bindgen_test]
    fn test_unparseable_timestamp_label() {
        let labeler = BrowserLabeler::new("en-US");
        assert_eq!(labeler.label(&Timestamp::from("yesterday-ish")), INVALID_DATE);
    }
}

