//! Map viewport and the single draggable marker.

use tracing::info;

use crate::model::LatLong;

pub const DEFAULT_ZOOM: u8 = 6;
pub const MAX_ZOOM: u8 = 19;
pub const TILE_ATTRIBUTION: &str = "© OpenStreetMap";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub id: u64,
    pub position: LatLong,
    pub draggable: bool,
}

/// Result of replacing the marker: the old one is gone, the new one is on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerTransition {
    pub removed: Marker,
    pub added: Marker,
}

#[derive(Debug, Clone)]
pub struct MapState {
    center: LatLong,
    zoom: u8,
    marker: Marker,
    next_marker_id: u64,
}

impl MapState {
    /// Starts with a marker at `center`.
    pub fn new(center: LatLong, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.min(MAX_ZOOM),
            marker: Marker {
                id: 0,
                position: center,
                draggable: true,
            },
            next_marker_id: 1,
        }
    }

    pub fn center(&self) -> LatLong {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn marker(&self) -> Marker {
        self.marker
    }

    /// Remove the current marker and add a fresh one at `position`.
    pub fn place_marker(&mut self, position: LatLong) -> MarkerTransition {
        let added = Marker {
            id: self.next_marker_id,
            position,
            draggable: true,
        };
        self.next_marker_id += 1;

        let removed = std::mem::replace(&mut self.marker, added);
        info!(removed = removed.id, added = added.id, %position, "marker replaced");

        MarkerTransition { removed, added }
    }

    /// Move the viewport; the zoom level is kept.
    pub fn fly_to(&mut self, position: LatLong) {
        self.center = position;
    }

    /// A click on the map drops the marker there without moving the viewport.
    pub fn click(&mut self, position: LatLong) -> MarkerTransition {
        self.place_marker(position)
    }

    /// OpenStreetMap link showing the viewport with the marker pinned.
    pub fn osm_link(&self) -> String {
        let LatLong { lat, lng } = self.marker.position;
        format!(
            "https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map={}/{}/{}",
            self.zoom, self.center.lat, self.center.lng
        )
    }
}

impl Default for MapState {
    fn default() -> Self {
        Self::new(LatLong::new(51.505, -0.09), DEFAULT_ZOOM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_marker_at_center() {
        let map = MapState::default();

        assert_eq!(map.marker().position, map.center());
        assert_eq!(map.zoom(), DEFAULT_ZOOM);
        assert!(map.marker().draggable);
    }

    #[test]
    fn place_marker_replaces_wholesale() {
        let mut map = MapState::default();
        let first = map.marker();

        let target = LatLong::new(48.85, 2.35);
        let transition = map.place_marker(target);

        assert_eq!(transition.removed, first);
        assert_eq!(transition.added.position, target);
        assert_ne!(transition.added.id, first.id);
        assert_eq!(map.marker(), transition.added);
    }

    #[test]
    fn click_does_not_move_viewport() {
        let mut map = MapState::default();
        let center = map.center();

        map.click(LatLong::new(10.0, 20.0));

        assert_eq!(map.center(), center);
        assert_eq!(map.marker().position, LatLong::new(10.0, 20.0));
    }

    #[test]
    fn marker_ids_increase() {
        let mut map = MapState::default();
        let a = map.place_marker(LatLong::new(1.0, 1.0)).added.id;
        let b = map.place_marker(LatLong::new(2.0, 2.0)).added.id;

        assert!(b > a);
    }

    #[test]
    fn zoom_is_capped() {
        let map = MapState::new(LatLong::new(0.0, 0.0), 42);
        assert_eq!(map.zoom(), MAX_ZOOM);
    }

    #[test]
    fn osm_link_pins_marker() {
        let mut map = MapState::default();
        map.place_marker(LatLong::new(48.85, 2.35));
        map.fly_to(LatLong::new(48.85, 2.35));

        assert_eq!(
            map.osm_link(),
            "https://www.openstreetmap.org/?mlat=48.85&mlon=2.35#map=6/48.85/2.35"
        );
    }
}
