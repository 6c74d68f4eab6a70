// Cercanos - core/geo.rs
//
// Map viewport fitting for the map view: the bounding box of the visible
// professionals, or a fixed default centre when nothing is visible.

use crate::core::model::{GeoPoint, Professional};
use crate::util::constants::{DEFAULT_MAP_CENTER, DEFAULT_MAP_ZOOM};

/// Axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
}

impl GeoBounds {
    /// Smallest box containing every point, or `None` for no points.
    pub fn around<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Self {
            south_west: first,
            north_east: first,
        };
        for p in points {
            bounds.extend(p);
        }
        Some(bounds)
    }

    /// Grow the box to include `p`.
    pub fn extend(&mut self, p: GeoPoint) {
        self.south_west.lat = self.south_west.lat.min(p.lat);
        self.south_west.lng = self.south_west.lng.min(p.lng);
        self.north_east.lat = self.north_east.lat.max(p.lat);
        self.north_east.lng = self.north_east.lng.max(p.lng);
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    pub fn contains(&self, p: GeoPoint) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&p.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&p.lng)
    }
}

/// What the map should show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapViewport {
    /// Fit to the markers.
    Fitted(GeoBounds),
    /// Nothing to show; centre on the default location.
    Default { center: GeoPoint, zoom: u8 },
}

impl MapViewport {
    /// Viewport for a set of visible professionals.
    pub fn fit(professionals: &[&Professional]) -> Self {
        match GeoBounds::around(professionals.iter().map(|p| p.location)) {
            Some(bounds) => MapViewport::Fitted(bounds),
            None => MapViewport::Default {
                center: GeoPoint::new(DEFAULT_MAP_CENTER.0, DEFAULT_MAP_CENTER.1),
                zoom: DEFAULT_MAP_ZOOM,
            },
        }
    }

    pub fn center(&self) -> GeoPoint {
        match self {
            MapViewport::Fitted(bounds) => bounds.center(),
            MapViewport::Default { center, .. } => *center,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prof_at(lat: f64, lng: f64) -> Professional {
        Professional {
            id: format!("{lat},{lng}"),
            name: String::new(),
            photo_url: String::new(),
            specialty: String::new(),
            rating: 0.0,
            review_count: 0,
            address: String::new(),
            phone: String::new(),
            insurances: Vec::new(),
            bio: String::new(),
            location: GeoPoint::new(lat, lng),
            reviews: Vec::new(),
        }
    }

    #[test]
    fn test_empty_falls_back_to_default_center() {
        let viewport = MapViewport::fit(&[]);
        assert_eq!(
            viewport,
            MapViewport::Default {
                center: GeoPoint::new(-34.603722, -58.381592),
                zoom: 13,
            }
        );
    }

    #[test]
    fn test_fit_spans_all_markers() {
        let a = prof_at(-34.66, -59.44);
        let b = prof_at(-34.64, -59.42);
        let c = prof_at(-34.65, -59.43);
        let viewport = MapViewport::fit(&[&a, &b, &c]);
        let MapViewport::Fitted(bounds) = viewport else {
            panic!("expected fitted viewport, got {viewport:?}");
        };
        assert_eq!(bounds.south_west, GeoPoint::new(-34.66, -59.44));
        assert_eq!(bounds.north_east, GeoPoint::new(-34.64, -59.42));
        assert!(bounds.contains(c.location));
        let center = viewport.center();
        assert!((center.lat + 34.65).abs() < 1e-9);
        assert!((center.lng + 59.43).abs() < 1e-9);
    }

    #[test]
    fn test_single_marker_is_degenerate_box() {
        let a = prof_at(-34.65, -59.43);
        let viewport = MapViewport::fit(&[&a]);
        assert_eq!(viewport.center(), a.location);
    }
}
