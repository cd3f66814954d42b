//! Leaflet bindings
//!
//! Just enough of the `L` global to place markers with popups, add the base
//! tile layer and move the viewport.

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use visits_dashboard::{LatLng, LatLngBounds, MapSurface, SurfaceError, TileLayerConfig};

#[wasm_bindgen(js_namespace = L)]
extern "C" {
    #[wasm_bindgen(js_name = Map)]
    pub type LeafletMap;

    #[wasm_bindgen(catch, js_name = map)]
    fn create_map(container: &web_sys::HtmlElement) -> Result<LeafletMap, JsValue>;

    #[wasm_bindgen(method, catch, js_name = setView)]
    fn set_view(this: &LeafletMap, center: &JsValue, zoom: f64) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = fitBounds)]
    fn fit_bounds(this: &LeafletMap, bounds: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &LeafletMap, layer: &JsValue);
}

#[wasm_bindgen(js_namespace = L)]
extern "C" {
    pub type TileLayer;

    #[wasm_bindgen(catch, js_name = tileLayer)]
    fn tile_layer(url: &str, options: &JsValue) -> Result<TileLayer, JsValue>;

    #[wasm_bindgen(method, catch, js_name = addTo)]
    fn add_to(this: &TileLayer, map: &LeafletMap) -> Result<JsValue, JsValue>;
}

#[wasm_bindgen(js_namespace = L)]
extern "C" {
    pub type Marker;

    #[wasm_bindgen(catch, js_name = marker)]
    fn marker(position: &JsValue) -> Result<Marker, JsValue>;

    #[wasm_bindgen(method, catch, js_name = addTo)]
    fn add_to(this: &Marker, map: &LeafletMap) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, js_name = bindPopup)]
    fn bind_popup(this: &Marker, content: &str) -> JsValue;
}

/// A Leaflet map attached to one container element
pub struct LeafletSurface {
    map: LeafletMap,
}

impl LeafletSurface {
    /// Create the map inside `container`
    ///
    /// Fails when Leaflet is not loaded, or when the container is not in the
    /// document yet: Leaflet sizes the map from the container on creation.
    pub fn attach(container: &web_sys::HtmlElement) -> Result<Self, SurfaceError> {
        if !container.is_connected() {
            return Err(SurfaceError::new("map container is not attached to the document"));
        }
        let map = create_map(container).map_err(js_error)?;
        Ok(Self { map })
    }
}

impl MapSurface for LeafletSurface {
    type Marker = Marker;

    fn set_view(&mut self, center: LatLng, zoom: u8) -> Result<(), SurfaceError> {
        self.map
            .set_view(&lat_lng(center), f64::from(zoom))
            .map(|_| ())
            .map_err(js_error)
    }

    fn add_tile_layer(&mut self, tiles: &TileLayerConfig) -> Result<(), SurfaceError> {
        let options = Object::new();
        Reflect::set(&options, &"attribution".into(), &tiles.attribution.as_str().into()).map_err(js_error)?;

        let layer = tile_layer(&tiles.url, &options).map_err(js_error)?;
        layer.add_to(&self.map).map(|_| ()).map_err(js_error)
    }

    fn add_marker(&mut self, position: LatLng, popup_html: &str) -> Result<Marker, SurfaceError> {
        let marker = marker(&lat_lng(position)).map_err(js_error)?;
        marker.add_to(&self.map).map_err(js_error)?;
        marker.bind_popup(popup_html);
        Ok(marker)
    }

    fn remove_marker(&mut self, marker: Marker) {
        self.map.remove_layer(&marker);
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds) {
        let corners = Array::of2(&lat_lng(bounds.south_west), &lat_lng(bounds.north_east));
        if let Err(e) = self.map.fit_bounds(&corners) {
            tracing::warn!("fitBounds failed: {}", js_error(e));
        }
    }
}

fn lat_lng(point: LatLng) -> JsValue {
    Array::of2(&point.lat.into(), &point.lng.into()).into()
}

/// Best-effort message from a thrown JS value
pub fn js_error(value: JsValue) -> SurfaceError {
    let message = value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value));
    SurfaceError::new(message)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn detached_div() -> web_sys::HtmlElement {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.create_element("div").ok())
            .and_then(|e| e.dyn_into::<web_sys::HtmlElement>().ok())
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn test_attach_rejects_detached_container() {
        let div = detached_div();
        match LeafletSurface::attach(&div) {
            Ok(_) => panic!("map created in a detached container"),
            Err(e) => assert!(e.0.contains("not attached"), "{}", e.0),
        }
    }
}
