//! Map view: provider script loading and marker lifecycle
//!
//! The view owns the map and every marker handle it created. It is *unloaded*
//! until the provider SDK is available and *ready* once a map instance has
//! been constructed. Marker lists are compared structurally; a changed list
//! tears down all existing markers and draws the new ones, then fits the
//! viewport around them.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::models::{Coordinate, MarkerData};
use crate::{GriddyError, Result};

pub const AUSTRALIA_CENTER: Coordinate = Coordinate {
    lat: -25.2744,
    lng: 133.7751,
};

pub const DEFAULT_ZOOM: u8 = 5;

const SCRIPT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/js";

const PIN_SVG: &str = r##"<svg width="24" height="24" viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg"><path d="M12 2C8.13 2 5 5.13 5 9c0 5.25 7 13 7 13s7-7.75 7-13c0-3.87-3.13-7-7-7z" fill="#dc2626"/><circle cx="12" cy="9" r="2.5" fill="white"/></svg>"##;

/// Provider script URL; the provider calls `initMap` once loaded
#[must_use]
pub fn script_url(api_key: &str) -> String {
    format!(
        "{SCRIPT_BASE_URL}?key={}&libraries=drawing&callback=initMap",
        urlencoding::encode(api_key)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MapType {
    Roadmap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapStyle {
    pub feature_type: String,
    pub element_type: String,
    pub color: String,
}

impl MapStyle {
    fn geometry(feature_type: &str, color: &str) -> Self {
        Self {
            feature_type: feature_type.to_string(),
            element_type: "geometry".to_string(),
            color: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    pub center: Coordinate,
    pub zoom: u8,
    pub map_type: MapType,
    pub styles: Vec<MapStyle>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: AUSTRALIA_CENTER,
            zoom: DEFAULT_ZOOM,
            map_type: MapType::Roadmap,
            styles: vec![
                MapStyle::geometry("water", "#a2daf2"),
                MapStyle::geometry("landscape", "#f5f5f2"),
            ],
        }
    }
}

/// Marker image, scaled size and anchor point in pixels
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerIcon {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub anchor_x: u32,
    pub anchor_y: u32,
}

impl MarkerIcon {
    /// Red 24px pin anchored at its bottom centre
    #[must_use]
    pub fn red_pin() -> Self {
        Self {
            url: format!(
                "data:image/svg+xml;charset=UTF-8,{}",
                urlencoding::encode(PIN_SVG)
            ),
            width: 24,
            height: 24,
            anchor_x: 12,
            anchor_y: 24,
        }
    }
}

/// Smallest box containing a set of points
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    #[must_use]
    pub fn around(point: Coordinate) -> Self {
        Self {
            south: point.lat,
            west: point.lng,
            north: point.lat,
            east: point.lng,
        }
    }

    pub fn extend(&mut self, point: Coordinate) {
        self.south = self.south.min(point.lat);
        self.north = self.north.max(point.lat);
        self.west = self.west.min(point.lng);
        self.east = self.east.max(point.lng);
    }

    /// `None` for an empty list
    #[must_use]
    pub fn from_markers(markers: &[MarkerData]) -> Option<Self> {
        let (first, rest) = markers.split_first()?;
        let mut bounds = Self::around(first.coordinate());
        for marker in rest {
            bounds.extend(marker.coordinate());
        }
        Some(bounds)
    }
}

/// The map SDK seen from the view. Implementations wrap a concrete provider.
pub trait MapProvider {
    /// Handle to a marker drawn on the map
    type Marker;

    fn create_map(&mut self, options: &MapOptions);
    fn add_marker(&mut self, marker: &MarkerData, icon: &MarkerIcon) -> Self::Marker;
    fn remove_marker(&mut self, marker: Self::Marker);
    fn fit_bounds(&mut self, bounds: &Bounds);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapState {
    Unloaded,
    Ready,
}

/// What the host has to do after [`MapView::mount`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountOutcome {
    /// The map is constructed
    Ready,
    /// Inject this script and call [`MapView::on_script_loaded`] when it loads
    LoadScript(String),
    /// A script was already requested; still waiting for it
    AwaitingScript,
}

pub struct MapView<P: MapProvider> {
    provider: P,
    api_key: Option<String>,
    options: MapOptions,
    icon: MarkerIcon,
    state: MapState,
    script_requested: bool,
    markers: Vec<MarkerData>,
    rendered: Vec<P::Marker>,
}

impl<P: MapProvider> MapView<P> {
    pub fn new(provider: P, api_key: Option<String>) -> Self {
        Self::with_options(provider, api_key, MapOptions::default())
    }

    pub fn with_options(provider: P, api_key: Option<String>, options: MapOptions) -> Self {
        Self {
            provider,
            api_key: api_key.filter(|key| !key.is_empty()),
            options,
            icon: MarkerIcon::red_pin(),
            state: MapState::Unloaded,
            script_requested: false,
            markers: Vec::new(),
            rendered: Vec::new(),
        }
    }

    pub fn state(&self) -> MapState {
        self.state
    }

    pub fn markers(&self) -> &[MarkerData] {
        &self.markers
    }

    /// Number of provider markers currently on the map
    pub fn rendered_count(&self) -> usize {
        self.rendered.len()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Attach the view. `sdk_present` tells whether the provider SDK is already loaded.
    pub fn mount(&mut self, sdk_present: bool) -> Result<MountOutcome> {
        if self.state == MapState::Ready {
            self.render();
            return Ok(MountOutcome::Ready);
        }

        if sdk_present {
            self.initialize();
            return Ok(MountOutcome::Ready);
        }

        if self.script_requested {
            return Ok(MountOutcome::AwaitingScript);
        }

        let Some(key) = self.api_key.as_deref() else {
            error!("Missing NEXT_PUBLIC_GOOGLE_MAPS_API_KEY");
            return Err(GriddyError::missing_key("NEXT_PUBLIC_GOOGLE_MAPS_API_KEY"));
        };

        self.script_requested = true;
        debug!("Requesting map provider script");
        Ok(MountOutcome::LoadScript(script_url(key)))
    }

    /// Provider script callback
    pub fn on_script_loaded(&mut self) {
        self.initialize();
    }

    /// Replace the marker list. Returns whether anything was redrawn.
    pub fn set_markers(&mut self, markers: Vec<MarkerData>) -> bool {
        if markers == self.markers {
            return false;
        }
        self.markers = markers;
        self.render();
        self.state == MapState::Ready
    }

    /// Detach the view: markers go, the map instance stays
    pub fn unmount(&mut self) {
        self.clear_markers();
    }

    fn initialize(&mut self) {
        if self.state == MapState::Unloaded {
            self.provider.create_map(&self.options);
            self.state = MapState::Ready;
            info!(
                "Map ready at {} zoom {}",
                self.options.center.format_coordinates(),
                self.options.zoom
            );
        }
        self.render();
    }

    fn render(&mut self) {
        if self.state != MapState::Ready {
            return;
        }

        self.clear_markers();

        for marker in &self.markers {
            let handle = self.provider.add_marker(marker, &self.icon);
            self.rendered.push(handle);
        }

        if let Some(bounds) = Bounds::from_markers(&self.markers) {
            self.provider.fit_bounds(&bounds);
        }

        debug!("Rendered {} markers", self.rendered.len());
    }

    fn clear_markers(&mut self) {
        for handle in self.rendered.drain(..) {
            self.provider.remove_marker(handle);
        }
    }
}

/// In-memory provider for terminals and tests
#[derive(Debug, Default)]
pub struct ConsoleMap {
    next_id: usize,
    options: Option<MapOptions>,
    visible: BTreeMap<usize, MarkerData>,
    viewport: Option<Bounds>,
}

impl ConsoleMap {
    pub fn options(&self) -> Option<&MapOptions> {
        self.options.as_ref()
    }

    pub fn visible(&self) -> impl Iterator<Item = &MarkerData> {
        self.visible.values()
    }

    pub fn viewport(&self) -> Option<Bounds> {
        self.viewport
    }

    /// One line per visible marker
    pub fn describe(&self) -> String {
        self.visible
            .values()
            .map(|marker| {
                format!(
                    "📍 {} {}",
                    marker.title.as_deref().unwrap_or("Marker"),
                    marker.coordinate().format_coordinates()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl MapProvider for ConsoleMap {
    type Marker = usize;

    fn create_map(&mut self, options: &MapOptions) {
        self.options = Some(options.clone());
    }

    fn add_marker(&mut self, marker: &MarkerData, _icon: &MarkerIcon) -> usize {
        self.next_id += 1;
        self.visible.insert(self.next_id, marker.clone());
        self.next_id
    }

    fn remove_marker(&mut self, marker: usize) {
        self.visible.remove(&marker);
    }

    fn fit_bounds(&mut self, bounds: &Bounds) {
        self.viewport = Some(*bounds);
    }
}
