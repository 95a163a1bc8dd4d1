//! Terminal stand-ins for the map, the list, the host and the device position.

use crate::map::{Geolocator, GeoError, Host, ListView, MapWidget, PanOptions, PopupOptions, TileLayerOptions};
use crate::render::ListEntry;
use crate::runtime::{Event, Runtime};
use crate::types::Coords;
use anyhow::{Result, bail};

/// Position taken from the command line.
#[derive(Debug, Clone, Copy)]
pub enum FixedPosition {
    At(Coords),
    Denied,
    Unsupported,
}

impl FixedPosition {
    pub const fn from_flags(at: Option<Coords>, no_geolocation: bool) -> Self {
        match (at, no_geolocation) {
            (_, true) => Self::Unsupported,
            (Some(c), false) => Self::At(c),
            (None, false) => Self::Denied,
        }
    }
}

impl Geolocator for FixedPosition {
    fn supported(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }

    fn request_position(&mut self, rt: &mut Runtime) {
        let event = match *self {
            Self::At(c) => Event::PositionFound(c),
            Self::Denied => Event::PositionFailed(GeoError::Denied),
            Self::Unsupported => Event::PositionFailed(GeoError::Unsupported),
        };
        rt.push(event);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub coords: Coords,
    pub class_name: String,
    pub content: String,
}

/// Remembers what a real map would be showing.
#[derive(Debug, Default)]
pub struct ConsoleMap {
    pub center: Option<Coords>,
    pub zoom: u8,
    pub tiles: Option<String>,
    pub listening: bool,
    pub markers: Vec<Marker>,
}

impl MapWidget for ConsoleMap {
    fn create_view(&mut self, center: Coords, zoom: u8) -> Result<()> {
        if self.center.is_some() {
            bail!("map view already created");
        }
        self.center = Some(center);
        self.zoom = zoom;
        Ok(())
    }

    fn add_tile_layer(&mut self, url: &str, options: &TileLayerOptions) -> Result<()> {
        tracing::debug!(url, max_zoom = options.max_zoom, "tile layer");
        self.tiles = Some(url.to_string());
        Ok(())
    }

    fn listen_clicks(&mut self) -> Result<()> {
        self.listening = true;
        Ok(())
    }

    fn add_marker(&mut self, coords: Coords, popup: &PopupOptions, content: &str) -> Result<()> {
        self.markers.push(Marker {
            coords,
            class_name: popup.class_name.clone(),
            content: content.to_string(),
        });
        Ok(())
    }

    fn set_view(&mut self, center: Coords, zoom: u8, pan: PanOptions) -> Result<()> {
        tracing::info!(center = %center, zoom, animate = pan.animate, "pan map");
        self.center = Some(center);
        self.zoom = zoom;
        Ok(())
    }
}

/// Entries in insertion order; [`Self::shown`] gives display order.
#[derive(Debug, Default)]
pub struct ConsoleList {
    entries: Vec<ListEntry>,
}

impl ConsoleList {
    pub fn shown(&self) -> impl Iterator<Item = &ListEntry> {
        self.entries.iter().rev()
    }
}

impl ListView for ConsoleList {
    fn insert_after_form(&mut self, entry: &ListEntry) -> Result<()> {
        self.entries.push(entry.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ConsoleHost {
    pub alerts: Vec<String>,
    pub reload_requested: bool,
}

impl Host for ConsoleHost {
    fn alert(&mut self, message: &str) {
        eprintln!("alert: {message}");
        self.alerts.push(message.to_string());
    }

    fn reload(&mut self) {
        tracing::info!("reload requested");
        self.reload_requested = true;
    }
}
