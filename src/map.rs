//! Interfaces to the things the app talks to but doesn't own: the map widget,
//! the device position, the rendered list and the hosting environment.

use crate::render::ListEntry;
use crate::runtime::Runtime;
use crate::types::Coords;
use anyhow::Result;
use thiserror::Error;

pub const MAP_ZOOM_LEVEL: u8 = 13;
pub const TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str =
    r#"&copy; <a href="http://www.openstreetmap.org/copyright">OpenStreetMap</a>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayerOptions {
    pub max_zoom: u8,
    pub attribution: String,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            max_zoom: 19,
            attribution: TILE_ATTRIBUTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupOptions {
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
    pub class_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanOptions {
    pub animate: bool,
    /// seconds
    pub duration: f64,
}

impl Default for PanOptions {
    fn default() -> Self {
        Self {
            animate: true,
            duration: 1.0,
        }
    }
}

/// Map widget. Clicks come back as [`crate::runtime::Event::MapClicked`].
pub trait MapWidget {
    fn create_view(&mut self, center: Coords, zoom: u8) -> Result<()>;
    fn add_tile_layer(&mut self, url: &str, options: &TileLayerOptions) -> Result<()>;
    fn listen_clicks(&mut self) -> Result<()>;
    /// Place a marker with its popup bound and opened.
    fn add_marker(&mut self, coords: Coords, popup: &PopupOptions, content: &str) -> Result<()>;
    fn set_view(&mut self, center: Coords, zoom: u8, pan: PanOptions) -> Result<()>;
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeoError {
    #[error("position unavailable or permission denied")]
    Denied,
    #[error("geolocation is not supported")]
    Unsupported,
}

impl GeoError {
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::Denied => "The application cannot work without access to geolocation :c",
            Self::Unsupported => "Looks like your browser or device doesn't support geolocation :/",
        }
    }
}

/// Device position provider.
///
/// A request is answered exactly once, by pushing either
/// `PositionFound` or `PositionFailed` onto the runtime, now or later.
pub trait Geolocator {
    fn supported(&self) -> bool {
        true
    }

    fn request_position(&mut self, rt: &mut Runtime);
}

/// The rendered workout list.
pub trait ListView {
    /// Insert right below the form, so the newest entry shows first.
    fn insert_after_form(&mut self, entry: &ListEntry) -> Result<()>;
}

/// The environment hosting the app.
pub trait Host {
    /// Blocking message to the user.
    fn alert(&mut self, message: &str);
    /// Throw the running app away and start a fresh one.
    fn reload(&mut self);
}
