use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::station::RouteTable;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LandmarkError {
    #[error("landmark {name} points at station {station_index}, which is not on the route")]
    UnknownStation { name: String, station_index: usize },

    #[error("station {0} already has a landmark")]
    Duplicate(usize),
}

/// Collectible reward tied to a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Landmark {
    pub station_index: usize,
    pub name: String,
    /// Opaque payload handed to the presentation layer as-is.
    pub visual: String,
    pub is_tunnel: bool,
}

impl Landmark {
    #[must_use]
    pub fn new(
        station_index: usize,
        name: impl Into<String>,
        visual: impl Into<String>,
        is_tunnel: bool,
    ) -> Self {
        Self {
            station_index,
            name: name.into(),
            visual: visual.into(),
            is_tunnel,
        }
    }
}

/// Sparse station-index to landmark mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LandmarkCatalog {
    by_station: BTreeMap<usize, Landmark>,
}

impl LandmarkCatalog {
    /// # Errors
    ///
    /// Returns `LandmarkError` if a landmark sits off the route or two
    /// landmarks share a station.
    pub fn new(
        landmarks: impl IntoIterator<Item = Landmark>,
        route: &RouteTable,
    ) -> Result<Self, LandmarkError> {
        let mut by_station = BTreeMap::new();
        for landmark in landmarks {
            if landmark.station_index >= route.len() {
                return Err(LandmarkError::UnknownStation {
                    name: landmark.name,
                    station_index: landmark.station_index,
                });
            }
            let station_index = landmark.station_index;
            if by_station.insert(station_index, landmark).is_some() {
                return Err(LandmarkError::Duplicate(station_index));
            }
        }
        Ok(Self { by_station })
    }

    #[must_use]
    pub fn get(&self, station_index: usize) -> Option<&Landmark> {
        self.by_station.get(&station_index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_station.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_station.is_empty()
    }

    /// Landmarks in route order.
    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.by_station.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::station::Station;

    fn route() -> RouteTable {
        RouteTable::new(vec![
            Station::new("A", true),
            Station::new("B", false),
            Station::new("C", true),
        ])
        .unwrap()
    }

    #[test]
    fn catalog_is_sparse_and_ordered() {
        let catalog = LandmarkCatalog::new(
            vec![
                Landmark::new(2, "Harbour", "harbour.png", false),
                Landmark::new(0, "Tower", "tower.png", false),
            ],
            &route(),
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(1).is_none());
        let names: Vec<_> = catalog.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Tower", "Harbour"]);
    }

    #[test]
    fn catalog_rejects_off_route_and_duplicates() {
        let err = LandmarkCatalog::new(vec![Landmark::new(3, "Far", "", false)], &route())
            .unwrap_err();
        assert!(matches!(err, LandmarkError::UnknownStation { station_index: 3, .. }));

        let err = LandmarkCatalog::new(
            vec![
                Landmark::new(1, "One", "", false),
                Landmark::new(1, "Two", "", true),
            ],
            &route(),
        )
        .unwrap_err();
        assert_eq!(err, LandmarkError::Duplicate(1));
    }
}
