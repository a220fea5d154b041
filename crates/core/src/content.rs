//! Built-in route, landmarks and sample questions.

use crate::model::{
    Landmark, LandmarkCatalog, LandmarkError, Question, QuestionDraft, QuestionError, RouteError,
    RouteTable, Station,
};

/// Tohoku and Hokkaido line stations, Tokyo to Shin-Hakodate-Hokuto.
/// The flag marks express stops.
const STATIONS: &[(&str, bool)] = &[
    ("Tokyo", true),
    ("Ueno", true),
    ("Omiya", true),
    ("Oyama", false),
    ("Utsunomiya", false),
    ("Nasushiobara", false),
    ("Shin-Shirakawa", false),
    ("Koriyama", false),
    ("Fukushima", false),
    ("Shiroishi-Zao", false),
    ("Sendai", true),
    ("Furukawa", false),
    ("Kurikoma-Kogen", false),
    ("Ichinoseki", false),
    ("Mizusawa-Esashi", false),
    ("Kitakami", false),
    ("Shin-Hanamaki", false),
    ("Morioka", true),
    ("Iwate-Numakunai", false),
    ("Ninohe", false),
    ("Hachinohe", false),
    ("Shichinohe-Towada", false),
    ("Shin-Aomori", true),
    ("Okutsugaru-Imabetsu", false),
    ("Kikonai", false),
    ("Shin-Hakodate-Hokuto", true),
];

/// `(station index, name, visual, is_tunnel)`
///
/// A landmark belongs to the station the train departs from, so the ones at
/// non-express stations (Nikko, Chuson-ji, the Seikan Tunnel, Goryokaku) can
/// only be collected on normal runs.
const LANDMARKS: &[(usize, &str, &str, bool)] = &[
    (0, "Marunouchi Station Building", "landmarks/marunouchi.svg", false),
    (4, "Nikko Toshogu", "landmarks/nikko.svg", false),
    (10, "Matsushima Bay", "landmarks/matsushima.svg", false),
    (13, "Chuson-ji Konjikido", "landmarks/chusonji.svg", false),
    (17, "Mount Iwate", "landmarks/iwate.svg", false),
    (22, "Nebuta Floats", "landmarks/nebuta.svg", false),
    (23, "Seikan Tunnel", "landmarks/seikan.svg", true),
    (24, "Goryokaku Fort", "landmarks/goryokaku.svg", false),
];

/// `(id, text, options, answer)`
const SAMPLE_QUESTIONS: &[(&str, &str, [&str; 5], u8)] = &[
    (
        "rail-001",
        "In which year did the first Shinkansen line open?",
        ["1958", "1964", "1970", "1972", "1982"],
        2,
    ),
    (
        "rail-002",
        "Which strait does the Seikan Tunnel run beneath?",
        ["Tsugaru", "Kanmon", "Soya", "Akashi", "Naruto"],
        1,
    ),
    (
        "rail-003",
        "What is the capital of Miyagi Prefecture?",
        ["Morioka", "Aomori", "Sendai", "Fukushima", "Yamagata"],
        3,
    ),
    (
        "rail-004",
        "Which fruit is Aomori Prefecture best known for?",
        ["Peaches", "Cherries", "Grapes", "Apples", "Melons"],
        4,
    ),
    (
        "rail-005",
        "What shape is the Goryokaku fort in Hakodate?",
        ["Circle", "Square", "Hexagon", "Triangle", "Star"],
        5,
    ),
    (
        "rail-006",
        "Which poet travelled the 'Narrow Road to the Deep North'?",
        ["Matsuo Basho", "Kobayashi Issa", "Yosa Buson", "Masaoka Shiki", "Ishikawa Takuboku"],
        1,
    ),
    (
        "rail-007",
        "Which dish is Utsunomiya famous for?",
        ["Ramen", "Gyoza", "Soba", "Tempura", "Okonomiyaki"],
        2,
    ),
    (
        "rail-008",
        "How many islands make up the Matsushima group, roughly?",
        ["About 20", "About 60", "About 260", "About 1,000", "About 5,000"],
        3,
    ),
    (
        "rail-009",
        "Which festival in Aomori features giant illuminated floats?",
        ["Gion", "Awa Odori", "Kanto", "Nebuta", "Tanabata"],
        4,
    ),
    (
        "rail-010",
        "What is the maximum commercial speed of the Tohoku Shinkansen, in km/h?",
        ["240", "260", "275", "300", "320"],
        5,
    ),
    (
        "rail-011",
        "Which island is Shin-Hakodate-Hokuto station on?",
        ["Hokkaido", "Honshu", "Shikoku", "Kyushu", "Sado"],
        1,
    ),
    (
        "rail-012",
        "Chuson-ji temple is located in which town?",
        ["Kakunodate", "Hiraizumi", "Tono", "Nikko", "Hirosaki"],
        2,
    ),
];

/// The default Tokyo to Shin-Hakodate-Hokuto route.
///
/// # Errors
///
/// Returns `RouteError` if the built-in table is malformed.
pub fn default_route() -> Result<RouteTable, RouteError> {
    RouteTable::new(
        STATIONS
            .iter()
            .map(|(name, express)| Station::new(*name, *express))
            .collect(),
    )
}

/// Landmarks along [`default_route`].
///
/// # Errors
///
/// Returns `LandmarkError` if a built-in landmark is off the route.
pub fn default_landmarks(route: &RouteTable) -> Result<LandmarkCatalog, LandmarkError> {
    LandmarkCatalog::new(
        LANDMARKS.iter().map(|(station, name, visual, tunnel)| {
            Landmark::new(*station, *name, *visual, *tunnel)
        }),
        route,
    )
}

/// Small trivia set for seeding and demos.
///
/// # Errors
///
/// Returns `QuestionError` if a built-in question is malformed.
pub fn sample_questions() -> Result<Vec<Question>, QuestionError> {
    SAMPLE_QUESTIONS
        .iter()
        .map(|(id, text, options, answer)| {
            QuestionDraft {
                id: (*id).to_owned(),
                text: (*text).to_owned(),
                options: options.iter().map(|o| (*o).to_owned()).collect(),
                answer_index: *answer,
            }
            .validate()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TravelMode;
    use crate::route::next_station;

    #[test]
    fn builtin_content_is_valid() {
        let route = default_route().unwrap();
        assert_eq!(route.name(0), "Tokyo");
        assert_eq!(route.name(route.last_index()), "Shin-Hakodate-Hokuto");
        let landmarks = default_landmarks(&route).unwrap();
        assert_eq!(landmarks.len(), LANDMARKS.len());
        assert_eq!(sample_questions().unwrap().len(), SAMPLE_QUESTIONS.len());
    }

    #[test]
    fn landmarks_sit_on_departure_stations() {
        let route = default_route().unwrap();
        let landmarks = default_landmarks(&route).unwrap();
        assert!(landmarks.iter().all(|l| !route.is_terminal(l.station_index)));
        assert!(landmarks.get(23).unwrap().is_tunnel);
    }

    #[test]
    fn express_runs_reach_only_express_stop_landmarks() {
        let route = default_route().unwrap();
        let landmarks = default_landmarks(&route).unwrap();
        let mut departures = vec![0];
        while let Some(next) =
            next_station(&route, *departures.last().unwrap(), TravelMode::Express)
        {
            departures.push(next);
        }
        let express: Vec<_> = landmarks
            .iter()
            .filter(|l| departures.contains(&l.station_index))
            .map(|l| l.station_index)
            .collect();
        assert_eq!(express, vec![0, 10, 17, 22]);

        let normal_only: Vec<_> = landmarks
            .iter()
            .filter(|l| !route.get(l.station_index).unwrap().is_express_stop())
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(
            normal_only,
            vec!["Nikko Toshogu", "Chuson-ji Konjikido", "Seikan Tunnel", "Goryokaku Fort"]
        );
    }

    #[test]
    fn express_run_visits_express_stops() {
        let route = default_route().unwrap();
        let mut stops = vec![0];
        while let Some(next) = next_station(&route, *stops.last().unwrap(), TravelMode::Express) {
            stops.push(next);
        }
        let names: Vec<_> = stops.iter().map(|i| route.name(*i)).collect();
        assert_eq!(
            names,
            vec![
                "Tokyo",
                "Ueno",
                "Omiya",
                "Sendai",
                "Morioka",
                "Shin-Aomori",
                "Shin-Hakodate-Hokuto"
            ]
        );
    }
}
