//! The five trip fields, taken from flags or asked for interactively.

use std::io;

use clap::Args;

use crate::prompt::TripRequest;

/// One input of the trip form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub flag: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
}

pub const DESTINATION: FormField = FormField {
    flag: "destination",
    label: "Destination",
    placeholder: "Enter your travel destination (e.g., Chennai)",
};

pub const ORIGIN: FormField = FormField {
    flag: "origin",
    label: "Origin",
    placeholder: "Enter your departure city (e.g., Detroit)",
};

pub const DEPARTURE_DATE: FormField = FormField {
    flag: "departure-date",
    label: "Departure Date",
    placeholder: "Enter your departure date (e.g., 2024-10-01)",
};

pub const RETURN_DATE: FormField = FormField {
    flag: "return-date",
    label: "Return Date",
    placeholder: "Enter your return date (e.g., 2024-10-10)",
};

pub const PREFERENCES: FormField = FormField {
    flag: "preferences",
    label: "Preferences",
    placeholder: "Enter any preferences (e.g., budget airlines, 4-star hotels)",
};

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("--{0} is required with --yes")]
    Missing(&'static str),

    #[error(transparent)]
    Prompt(#[from] io::Error),
}

#[derive(Args, Debug, Clone, Default)]
pub struct TripArgs {
    /// Travel destination
    #[arg(long)]
    pub destination: Option<String>,

    /// Departure city
    #[arg(long)]
    pub origin: Option<String>,

    /// Departure date
    #[arg(long, value_name = "DATE")]
    pub departure_date: Option<String>,

    /// Return date
    #[arg(long, value_name = "DATE")]
    pub return_date: Option<String>,

    /// Airline, hotel or budget preferences
    #[arg(long)]
    pub preferences: Option<String>,
}

impl TripArgs {
    /// Builds the request, calling `ask` for every field not given as a
    /// flag, in form order. With `no_prompt` a missing field is an error.
    /// Blank values count as missing.
    pub fn resolve<F>(self, no_prompt: bool, mut ask: F) -> Result<TripRequest, FormError>
    where
        F: FnMut(&FormField) -> io::Result<String>,
    {
        let mut fill = |given: Option<String>, field: &FormField| -> Result<String, FormError> {
            match given.filter(|value| !value.trim().is_empty()) {
                Some(value) => Ok(value.trim().to_owned()),
                None if no_prompt => Err(FormError::Missing(field.flag)),
                None => Ok(ask(field)?.trim().to_owned()),
            }
        };

        Ok(TripRequest {
            destination: fill(self.destination, &DESTINATION)?,
            origin: fill(self.origin, &ORIGIN)?,
            departure_date: fill(self.departure_date, &DEPARTURE_DATE)?,
            return_date: fill(self.return_date, &RETURN_DATE)?,
            preferences: fill(self.preferences, &PREFERENCES)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::VecDeque;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        trip: TripArgs,
    }

    /// Answers prompts from a script and records which fields were asked.
    fn scripted(
        answers: &[&str],
        asked: &mut Vec<&'static str>,
    ) -> impl FnMut(&FormField) -> io::Result<String> {
        let mut answers: VecDeque<String> = answers.iter().map(|a| a.to_string()).collect();
        move |field| {
            asked.push(field.label);
            answers
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no answer"))
        }
    }

    #[test]
    fn test_prompts_every_field_in_form_order() {
        let mut asked = Vec::new();
        let request = TripArgs::default()
            .resolve(
                false,
                scripted(
                    &["Chennai", " Detroit ", "2025-10-30", "2025-11-10", "4-star hotels"],
                    &mut asked,
                ),
            )
            .unwrap();

        assert_eq!(
            asked,
            ["Destination", "Origin", "Departure Date", "Return Date", "Preferences"]
        );
        assert_eq!(
            request,
            TripRequest {
                destination: "Chennai".into(),
                origin: "Detroit".into(),
                departure_date: "2025-10-30".into(),
                return_date: "2025-11-10".into(),
                preferences: "4-star hotels".into(),
            }
        );
    }

    #[test]
    fn test_flags_skip_their_prompts() {
        let cli = Cli::try_parse_from([
            "trip_planner",
            "--destination",
            "Chennai",
            "--departure-date",
            "2025-10-30",
            "--preferences",
            "  ",
        ])
        .unwrap();

        let mut asked = Vec::new();
        let request = cli
            .trip
            .resolve(false, scripted(&["Detroit", "2025-11-10", "none"], &mut asked))
            .unwrap();

        assert_eq!(asked, ["Origin", "Return Date", "Preferences"]);
        assert_eq!(request.destination, "Chennai");
        assert_eq!(request.origin, "Detroit");
        assert_eq!(request.departure_date, "2025-10-30");
        assert_eq!(request.preferences, "none");
    }

    #[test]
    fn test_no_prompt_requires_every_flag() {
        let cli = Cli::try_parse_from(["trip_planner", "--destination", "Chennai"]).unwrap();
        let mut asked = Vec::new();
        let err = cli.trip.resolve(true, scripted(&[], &mut asked)).unwrap_err();

        assert!(matches!(err, FormError::Missing("origin")));
        assert_eq!(err.to_string(), "--origin is required with --yes");
        assert!(asked.is_empty());
    }

    #[test]
    fn test_prompt_failure_is_reported() {
        let mut asked = Vec::new();
        let err = TripArgs::default()
            .resolve(false, scripted(&["Chennai"], &mut asked))
            .unwrap_err();
        assert!(matches!(err, FormError::Prompt(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
        assert_eq!(asked, ["Destination", "Origin"]);
    }
}
