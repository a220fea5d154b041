//! Request boundary: raw strings in, typed answers out.

use quiz_core::model::{OPTION_COUNT, TravelMode};
use quiz_core::progression::Answer;
use quiz_core::speed::{MAX_SPEED, Speed};

use crate::error::InputError;

/// Parse a travel mode sent by the client.
///
/// # Errors
///
/// Returns `InputError::Missing` for an absent or blank value and
/// `InputError::Mode` for anything other than `normal` / `express`.
pub fn parse_mode(raw: Option<&str>) -> Result<TravelMode, InputError> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(InputError::Missing { field: "mode" })?;
    Ok(raw.parse()?)
}

/// Raw answer fields as submitted by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnswerForm<'a> {
    pub choice: Option<&'a str>,
    pub client_speed: Option<&'a str>,
    pub landmark_acquired: Option<&'a str>,
}

impl<'a> AnswerForm<'a> {
    #[must_use]
    pub fn new(choice: &'a str) -> Self {
        Self {
            choice: Some(choice),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_client_speed(mut self, raw: &'a str) -> Self {
        self.client_speed = Some(raw);
        self
    }

    #[must_use]
    pub fn with_landmark_acquired(mut self, raw: &'a str) -> Self {
        self.landmark_acquired = Some(raw);
        self
    }

    /// Validate the form into an [`Answer`].
    ///
    /// A missing speed reads as a stopped train and a missing landmark flag
    /// as `false`. Speeds outside `0..=320` are clamped.
    ///
    /// # Errors
    ///
    /// Returns `InputError` when the choice is missing, not a number, or not
    /// one of the offered options, or when speed or flag cannot be parsed.
    pub fn parse(&self) -> Result<Answer, InputError> {
        Ok(Answer {
            choice: parse_choice(self.choice)?,
            client_speed: parse_speed(self.client_speed)?,
            landmark_acquired: parse_flag(self.landmark_acquired)?,
        })
    }
}

fn parse_choice(raw: Option<&str>) -> Result<u8, InputError> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(InputError::Missing { field: "choice" })?;
    let value: i64 = raw.parse().map_err(|_| InputError::Invalid {
        field: "choice",
        raw: raw.to_owned(),
    })?;
    let out_of_range = || InputError::ChoiceOutOfRange {
        raw: raw.to_owned(),
        options: OPTION_COUNT,
    };
    let ordinal = usize::try_from(value).map_err(|_| out_of_range())?;
    if !(1..=OPTION_COUNT).contains(&ordinal) {
        return Err(out_of_range());
    }
    u8::try_from(ordinal).map_err(|_| out_of_range())
}

fn parse_speed(raw: Option<&str>) -> Result<Speed, InputError> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(Speed::new(0));
    };
    let value: i64 = raw.parse().map_err(|_| InputError::Invalid {
        field: "client_speed",
        raw: raw.to_owned(),
    })?;
    let clamped = value.clamp(0, i64::from(MAX_SPEED));
    Ok(Speed::new(u32::try_from(clamped).unwrap_or(0)))
}

fn parse_flag(raw: Option<&str>) -> Result<bool, InputError> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(false);
    };
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "on" => Ok(true),
        "false" | "0" | "off" => Ok(false),
        _ => Err(InputError::Invalid {
            field: "landmark_acquired",
            raw: raw.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_form() {
        let answer = AnswerForm::new("3")
            .with_client_speed("120")
            .with_landmark_acquired("on")
            .parse()
            .unwrap();
        assert_eq!(answer.choice, 3);
        assert_eq!(answer.client_speed, Speed::new(120));
        assert!(answer.landmark_acquired);
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let answer = AnswerForm::new(" 1 ").parse().unwrap();
        assert_eq!(answer.choice, 1);
        assert_eq!(answer.client_speed.value(), 0);
        assert!(!answer.landmark_acquired);
    }

    #[test]
    fn rejects_missing_or_non_numeric_choice() {
        assert_eq!(
            AnswerForm::default().parse(),
            Err(InputError::Missing { field: "choice" })
        );
        assert!(matches!(
            AnswerForm::new("two").parse(),
            Err(InputError::Invalid { field: "choice", .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_choice() {
        for raw in ["0", "6", "-1", "300"] {
            assert!(
                matches!(
                    AnswerForm::new(raw).parse(),
                    Err(InputError::ChoiceOutOfRange { options: 5, .. })
                ),
                "{raw} should be rejected"
            );
        }
        assert!(AnswerForm::new("5").parse().is_ok());
    }

    #[test]
    fn clamps_client_speed() {
        let fast = AnswerForm::new("1").with_client_speed("9000").parse().unwrap();
        assert_eq!(fast.client_speed.value(), 320);
        let reverse = AnswerForm::new("1").with_client_speed("-40").parse().unwrap();
        assert_eq!(reverse.client_speed.value(), 0);
        assert!(matches!(
            AnswerForm::new("1").with_client_speed("fast").parse(),
            Err(InputError::Invalid { field: "client_speed", .. })
        ));
    }

    #[test]
    fn landmark_flag_spellings() {
        for (raw, expected) in [("TRUE", true), ("1", true), ("off", false), ("0", false)] {
            let answer = AnswerForm::new("1")
                .with_landmark_acquired(raw)
                .parse()
                .unwrap();
            assert_eq!(answer.landmark_acquired, expected, "{raw}");
        }
        assert!(
            AnswerForm::new("1")
                .with_landmark_acquired("maybe")
                .parse()
                .is_err()
        );
    }

    #[test]
    fn mode_parsing() {
        assert_eq!(parse_mode(Some("Express")).unwrap(), TravelMode::Express);
        assert_eq!(parse_mode(Some(" normal ")).unwrap(), TravelMode::Normal);
        assert_eq!(parse_mode(Some("nozomi")).unwrap(), TravelMode::Express);
        assert_eq!(parse_mode(None), Err(InputError::Missing { field: "mode" }));
        assert!(matches!(parse_mode(Some("bullet")), Err(InputError::Mode(_))));
    }
}
