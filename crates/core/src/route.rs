use crate::model::{RouteTable, TravelMode};

/// Next stop after `current` for the given mode.
///
/// Normal mode always moves one station. Express mode skips ahead to the next
/// express stop, falling back to the terminal when no express stop remains,
/// so both modes finish at the same station.
///
/// Returns `None` when `current` is already the terminal.
#[must_use]
pub fn next_station(route: &RouteTable, current: usize, mode: TravelMode) -> Option<usize> {
    let last = route.last_index();
    if current >= last {
        return None;
    }

    match mode {
        TravelMode::Normal => Some(current + 1),
        TravelMode::Express => {
            let stop = route.stations()[current + 1..=last]
                .iter()
                .position(|s| s.is_express_stop())
                .map_or(last, |offset| current + 1 + offset);
            Some(stop)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Station;

    fn route(express: &[bool]) -> RouteTable {
        RouteTable::new(
            express
                .iter()
                .enumerate()
                .map(|(i, e)| Station::new(format!("S{i}"), *e))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn normal_mode_steps_by_one() {
        let r = route(&[true, false, false, true, false]);
        for current in 0..r.last_index() {
            assert_eq!(next_station(&r, current, TravelMode::Normal), Some(current + 1));
        }
    }

    #[test]
    fn express_mode_skips_to_next_express_stop() {
        let r = route(&[true, false, false, true, false, true]);
        assert_eq!(next_station(&r, 0, TravelMode::Express), Some(3));
        assert_eq!(next_station(&r, 1, TravelMode::Express), Some(3));
        assert_eq!(next_station(&r, 3, TravelMode::Express), Some(5));
    }

    #[test]
    fn express_mode_falls_back_to_terminal() {
        let r = route(&[true, false, true, false, false]);
        assert_eq!(next_station(&r, 2, TravelMode::Express), Some(4));
    }

    #[test]
    fn express_always_lands_on_express_stop_or_terminal() {
        let r = route(&[true, false, true, false, false, true, false, false]);
        let mut current = 0;
        while let Some(next) = next_station(&r, current, TravelMode::Express) {
            assert!(next > current);
            assert!(r.stations()[next].is_express_stop() || r.is_terminal(next));
            current = next;
        }
        assert_eq!(current, r.last_index());
    }

    #[test]
    fn terminal_has_no_next_station() {
        let r = route(&[true, true]);
        assert_eq!(next_station(&r, 1, TravelMode::Normal), None);
        assert_eq!(next_station(&r, 1, TravelMode::Express), None);
    }
}
