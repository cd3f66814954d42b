//! Page bootstrap
//!
//! Reads what the hosting page embedded for the first render and installs
//! the page-wide truncated-text tooltip behavior.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use visits_dashboard::{DashboardConfig, InitialPayload};

/// Element holding the server-rendered JSON payload
pub const PAYLOAD_ELEMENT_ID: &str = "dashboard-data";

/// Optional element holding TOML configuration
pub const CONFIG_ELEMENT_ID: &str = "dashboard-config";

/// Marker class for text that may be cut off by its container
pub const TRUNCATED_CLASS: &str = "text-truncate";

/// Everything the page needs before mounting
pub struct Bootstrap {
    pub config: DashboardConfig,
    pub payload: InitialPayload,
    problems: Vec<String>,
}

impl Bootstrap {
    /// Read the embedded config and payload, falling back to defaults
    pub fn from_document() -> Self {
        Self::from_texts(
            embedded_text(CONFIG_ELEMENT_ID).as_deref(),
            embedded_text(PAYLOAD_ELEMENT_ID).as_deref(),
        )
    }

    /// Parse the embedded texts; anything missing or malformed falls back
    /// to defaults and is recorded for [`Bootstrap::report`]
    pub fn from_texts(config: Option<&str>, payload: Option<&str>) -> Self {
        let mut problems = Vec::new();

        let config = match config {
            Some(text) => DashboardConfig::from_toml_str(text).unwrap_or_else(|e| {
                problems.push(format!("Ignoring embedded config: {}", e));
                DashboardConfig::default()
            }),
            None => DashboardConfig::default(),
        };

        let payload = match payload {
            Some(text) => InitialPayload::from_json(text).unwrap_or_else(|e| {
                problems.push(format!("Initial data unavailable: {}", e));
                InitialPayload::default()
            }),
            None => {
                problems.push(format!("No #{} element on the page", PAYLOAD_ELEMENT_ID));
                InitialPayload::default()
            }
        };

        Self {
            config,
            payload,
            problems,
        }
    }

    /// Log what went wrong while reading the page; call once logging is up
    pub fn report(&self) {
        for problem in &self.problems {
            tracing::error!("{}", problem);
        }
        tracing::info!(
            locations = self.payload.locations.len(),
            points = self.payload.traffic.len(),
            "Dashboard data loaded"
        );
    }
}

fn embedded_text(id: &str) -> Option<String> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .text_content()
        .filter(|text| !text.trim().is_empty())
}

#[wasm_bindgen(js_namespace = bootstrap)]
extern "C" {
    type Tooltip;

    #[wasm_bindgen(constructor, catch)]
    fn new(element: &web_sys::Element) -> Result<Tooltip, JsValue>;

    #[wasm_bindgen(method)]
    fn show(this: &Tooltip);
}

/// Content is cut off when it is wider than its box
pub fn is_truncated(scroll_width: i32, client_width: i32) -> bool {
    scroll_width > client_width
}

/// Disclose the full text of truncated elements on hover
///
/// One delegated listener on the document covers elements rendered later,
/// such as visitor table rows replaced by a refresh.
pub fn activate_truncation_tooltips() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let on_hover = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        let Some(element) = event
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .and_then(|e| e.closest(&format!(".{}", TRUNCATED_CLASS)).ok().flatten())
        else {
            return;
        };
        disclose(&element);
    });

    if let Err(e) = document.add_event_listener_with_callback("mouseover", on_hover.as_ref().unchecked_ref()) {
        tracing::warn!("Tooltips disabled: {:?}", e);
        return;
    }
    on_hover.forget();
}

fn disclose(element: &web_sys::Element) {
    if !is_truncated(element.scroll_width(), element.client_width()) {
        return;
    }
    if element.has_attribute("data-bs-toggle") {
        return;
    }

    let text = element.text_content().unwrap_or_default();
    for (name, value) in [
        ("title", text.trim()),
        ("data-bs-toggle", "tooltip"),
        ("data-bs-placement", "top"),
    ] {
        if let Err(e) = element.set_attribute(name, value) {
            tracing::debug!("Could not set {} on truncated element: {:?}", name, e);
        }
    }

    // Bootstrap is optional; the title attribute alone still discloses the text
    match Tooltip::new(element) {
        Ok(tooltip) => tooltip.show(),
        Err(_) => tracing::debug!("Bootstrap tooltips unavailable, using title attribute"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_truncated() {
        assert!(is_truncated(240, 200));
        assert!(!is_truncated(200, 200));
        assert!(!is_truncated(0, 0));
    }

    const PAYLOAD: &str = r#"{"locations": [{"ip": "1.2.3.4", "city": "Paris", "country": "FR", "lat": 48.85, "lon": 2.35, "visits": 7}], "traffic": [["2024-03-01 13:00:00", 12]]}"#;

    #[test]
    fn test_from_texts_reads_both() {
        let boot = Bootstrap::from_texts(Some("[refresh]\ninterval_ms = 60000\n"), Some(PAYLOAD));

        assert!(boot.problems.is_empty());
        assert_eq!(boot.config.refresh.interval_ms, 60_000);
        assert_eq!(boot.payload.locations.len(), 1);
        assert_eq!(boot.payload.traffic.len(), 1);
    }

    #[test]
    fn test_missing_payload_renders_empty() {
        let boot = Bootstrap::from_texts(None, None);

        assert!(boot.payload.locations.is_empty());
        assert!(boot.payload.traffic.is_empty());
        assert_eq!(boot.problems.len(), 1);
        assert!(boot.problems[0].contains(PAYLOAD_ELEMENT_ID));
        // no embedded config is not a problem
        assert_eq!(boot.config.refresh.interval_ms, 300_000);
    }

    #[test]
    fn test_malformed_payload_renders_empty() {
        let boot = Bootstrap::from_texts(None, Some(r#"{"locations": [{"ip": 5}"#));

        assert!(boot.payload.locations.is_empty());
        assert!(boot.payload.traffic.is_empty());
        assert_eq!(boot.problems.len(), 1);
        assert!(boot.problems[0].starts_with("Initial data unavailable"));
    }

    #[test]
    fn test_bad_config_falls_back_to_defaults() {
        let boot = Bootstrap::from_texts(Some("[refresh\ninterval_ms = "), Some(PAYLOAD));

        assert_eq!(boot.problems.len(), 1);
        assert!(boot.problems[0].starts_with("Ignoring embedded config"));
        assert_eq!(boot.config.refresh.endpoint, "/api/locations");
        // the payload is still used
        assert_eq!(boot.payload.locations[0].city, "Paris");
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod dom_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn attached(style: &str, text: &str) -> web_sys::Element {
        let document = web_sys::window().and_then(|w| w.document()).unwrap();
        let element = document.create_element("span").unwrap();
        element.set_attribute("class", TRUNCATED_CLASS).unwrap();
        element.set_attribute("style", style).unwrap();
        element.set_text_content(Some(text));
        document.body().unwrap().append_child(&element).unwrap();
        element
    }

    #[wasm_bindgen_test]
    fn test_disclose_sets_title_on_truncated_text() {
        let element = attached(
            "display:inline-block;width:20px;overflow:hidden;white-space:nowrap",
            "  Yamoussoukro, Côte d'Ivoire  ",
        );
        disclose(&element);

        assert_eq!(element.get_attribute("title").as_deref(), Some("Yamoussoukro, Côte d'Ivoire"));
        assert_eq!(element.get_attribute("data-bs-toggle").as_deref(), Some("tooltip"));
        assert_eq!(element.get_attribute("data-bs-placement").as_deref(), Some("top"));
        element.remove();
    }

    #[wasm_bindgen_test]
    fn test_disclose_leaves_fitting_text_alone() {
        let element = attached("display:inline-block;white-space:nowrap", "Oslo");
        disclose(&element);

        assert!(element.get_attribute("title").is_none());
        assert!(!element.has_attribute("data-bs-toggle"));
        element.remove();
    }
}
