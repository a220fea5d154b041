use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RouteError {
    #[error("a route needs at least two stations, got {0}")]
    TooShort(usize),

    #[error("station {index} has an empty name")]
    EmptyStationName { index: usize },
}

/// A stop on the route. Identified by its position in the [`RouteTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    name: String,
    is_express_stop: bool,
}

impl Station {
    #[must_use]
    pub fn new(name: impl Into<String>, is_express_stop: bool) -> Self {
        Self {
            name: name.into(),
            is_express_stop,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_express_stop(&self) -> bool {
        self.is_express_stop
    }
}

/// Ordered, immutable list of stations. The last entry is the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    stations: Vec<Station>,
}

impl RouteTable {
    /// # Errors
    ///
    /// Returns `RouteError::TooShort` for fewer than two stations and
    /// `RouteError::EmptyStationName` for a blank station name.
    pub fn new(stations: Vec<Station>) -> Result<Self, RouteError> {
        if stations.len() < 2 {
            return Err(RouteError::TooShort(stations.len()));
        }
        if let Some(index) = stations.iter().position(|s| s.name.trim().is_empty()) {
            return Err(RouteError::EmptyStationName { index });
        }
        Ok(Self { stations })
    }

    #[must_use]
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Station> {
        self.stations.get(index)
    }

    /// Name of the station at `index`, or an empty string when out of range.
    #[must_use]
    pub fn name(&self, index: usize) -> &str {
        self.get(index).map_or("", Station::name)
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.stations.len().saturating_sub(1)
    }

    #[must_use]
    pub fn is_terminal(&self, index: usize) -> bool {
        index >= self.last_index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_single_station_route() {
        let err = RouteTable::new(vec![Station::new("Tokyo", true)]).unwrap_err();
        assert_eq!(err, RouteError::TooShort(1));
    }

    #[test]
    fn rejects_blank_station_name() {
        let err = RouteTable::new(vec![Station::new("Tokyo", true), Station::new(" ", false)])
            .unwrap_err();
        assert_eq!(err, RouteError::EmptyStationName { index: 1 });
    }

    #[test]
    fn terminal_is_last_index() {
        let route = RouteTable::new(vec![
            Station::new("A", true),
            Station::new("B", false),
            Station::new("C", true),
        ])
        .unwrap();
        assert_eq!(route.last_index(), 2);
        assert!(route.is_terminal(2));
        assert!(!route.is_terminal(1));
        assert_eq!(route.name(1), "B");
        assert_eq!(route.name(9), "");
    }
}
