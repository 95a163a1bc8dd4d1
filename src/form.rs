use crate::types::{Coords, Workout, WorkoutType};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Distance,
    Duration,
    Cadence,
    Elevation,
}

/// Inline styling while the form animates away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStyle {
    /// Grid layout, stylesheet-driven.
    #[default]
    Default,
    /// Opacity and width forced to 0.
    FadedOut,
    /// `display: none` until the layout is restored.
    Collapsed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub hidden: bool,
    pub style: FormStyle,
    pub workout_type: WorkoutType,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
    pub cadence_row_hidden: bool,
    pub elevation_row_hidden: bool,
    pub focused: Option<Field>,
}

impl Default for Form {
    fn default() -> Self {
        Self {
            hidden: true,
            style: FormStyle::Default,
            workout_type: WorkoutType::Running,
            distance: String::new(),
            duration: String::new(),
            cadence: String::new(),
            elevation: String::new(),
            cadence_row_hidden: false,
            elevation_row_hidden: true,
            focused: None,
        }
    }
}

impl Form {
    pub const fn is_shown(&self) -> bool {
        !self.hidden && matches!(self.style, FormStyle::Default)
    }

    pub fn show(&mut self) {
        self.hidden = false;
        self.focused = Some(Field::Distance);
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Distance => &mut self.distance,
            Field::Duration => &mut self.duration,
            Field::Cadence => &mut self.cadence,
            Field::Elevation => &mut self.elevation,
        };
        *slot = value.into();
    }

    pub const fn toggle_rows(&mut self) {
        self.cadence_row_hidden = !self.cadence_row_hidden;
        self.elevation_row_hidden = !self.elevation_row_hidden;
    }

    /// Escape only closes a visible form, and keeps whatever was typed.
    pub const fn escape(&mut self) -> bool {
        if self.hidden {
            return false;
        }
        self.hidden = true;
        self.focused = None;
        true
    }

    pub fn begin_close(&mut self) {
        self.distance.clear();
        self.duration.clear();
        self.cadence.clear();
        self.elevation.clear();
        self.focused = None;
        self.style = FormStyle::FadedOut;
    }

    pub const fn collapse(&mut self) {
        self.hidden = true;
        self.style = FormStyle::Collapsed;
    }

    pub const fn restore_layout(&mut self) {
        self.style = FormStyle::Default;
    }

    pub fn read(&self) -> FormInput {
        FormInput {
            workout_type: self.workout_type,
            distance: to_number(&self.distance),
            duration: to_number(&self.duration),
            cadence: to_number(&self.cadence),
            elevation: to_number(&self.elevation),
        }
    }
}

/// Numeric coercion of input text: blank is 0, junk is NaN.
pub fn to_number(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Inputs must be positive number!")]
    InvalidInput,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormInput {
    pub workout_type: WorkoutType,
    pub distance: f64,
    pub duration: f64,
    pub cadence: f64,
    pub elevation: f64,
}

/// Validated submission, waiting for its map location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NewWorkout {
    Running {
        distance: f64,
        duration: f64,
        cadence: f64,
    },
    Cycling {
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    },
}

impl NewWorkout {
    pub fn place(self, coords: Coords) -> Workout {
        match self {
            Self::Running {
                distance,
                duration,
                cadence,
            } => Workout::running(coords, distance, duration, cadence),
            Self::Cycling {
                distance,
                duration,
                elevation_gain,
            } => Workout::cycling(coords, distance, duration, elevation_gain),
        }
    }
}

fn all_finite(xs: &[f64]) -> bool {
    xs.iter().all(|x| x.is_finite())
}

fn all_positive(xs: &[f64]) -> bool {
    xs.iter().all(|&x| x > 0.0)
}

impl FormInput {
    /// Elevation gain only has to be finite; zero and negative climbs pass.
    pub fn validate(&self) -> Result<NewWorkout, FormError> {
        let Self {
            workout_type,
            distance,
            duration,
            cadence,
            elevation,
        } = *self;

        match workout_type {
            WorkoutType::Running => {
                let xs = [distance, duration, cadence];
                if !all_finite(&xs) || !all_positive(&xs) {
                    return Err(FormError::InvalidInput);
                }
                Ok(NewWorkout::Running {
                    distance,
                    duration,
                    cadence,
                })
            }
            WorkoutType::Cycling => {
                if !all_finite(&[distance, duration, elevation])
                    || !all_positive(&[distance, duration])
                {
                    return Err(FormError::InvalidInput);
                }
                Ok(NewWorkout::Cycling {
                    distance,
                    duration,
                    elevation_gain: elevation,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(ty: WorkoutType, d: &str, t: &str, c: &str, e: &str) -> Form {
        let mut f = Form {
            workout_type: ty,
            ..Form::default()
        };
        f.set_field(Field::Distance, d);
        f.set_field(Field::Duration, t);
        f.set_field(Field::Cadence, c);
        f.set_field(Field::Elevation, e);
        f
    }

    #[test]
    fn coercion() {
        assert_eq!(to_number(""), 0.0);
        assert_eq!(to_number("  12.5 "), 12.5);
        assert!(to_number("abc").is_nan());
        assert!(to_number("5km").is_nan());
    }

    #[test]
    fn running_requires_all_positive() {
        let ok = filled(WorkoutType::Running, "5", "25", "170", "");
        assert_eq!(
            ok.read().validate(),
            Ok(NewWorkout::Running {
                distance: 5.0,
                duration: 25.0,
                cadence: 170.0
            })
        );

        for (d, t, c) in [("-5", "25", "170"), ("5", "0", "170"), ("5", "25", "abc"), ("5", "25", "")] {
            let f = filled(WorkoutType::Running, d, t, c, "");
            assert_eq!(f.read().validate(), Err(FormError::InvalidInput), "{d} {t} {c}");
        }
    }

    #[test]
    fn cycling_elevation_only_needs_to_be_finite() {
        let flat = filled(WorkoutType::Cycling, "20", "60", "", "0");
        assert!(flat.read().validate().is_ok());

        let downhill = filled(WorkoutType::Cycling, "20", "60", "", "-40");
        assert_eq!(
            downhill.read().validate(),
            Ok(NewWorkout::Cycling {
                distance: 20.0,
                duration: 60.0,
                elevation_gain: -40.0
            })
        );

        let junk = filled(WorkoutType::Cycling, "20", "60", "", "up");
        assert_eq!(junk.read().validate(), Err(FormError::InvalidInput));

        let neg = filled(WorkoutType::Cycling, "-20", "60", "", "10");
        assert_eq!(neg.read().validate(), Err(FormError::InvalidInput));
    }

    #[test]
    fn rows_toggle_together() {
        let mut f = Form::default();
        assert!(!f.cadence_row_hidden && f.elevation_row_hidden);
        f.toggle_rows();
        assert!(f.cadence_row_hidden && !f.elevation_row_hidden);
        f.toggle_rows();
        assert!(!f.cadence_row_hidden && f.elevation_row_hidden);
    }

    #[test]
    fn escape_keeps_input_but_close_clears_it() {
        let mut f = Form::default();
        assert!(!f.escape());

        f.show();
        f.set_field(Field::Distance, "7");
        assert!(f.escape());
        assert!(f.hidden);
        assert_eq!(f.distance, "7");

        f.show();
        f.begin_close();
        assert!(f.distance.is_empty());
        assert_eq!(f.style, FormStyle::FadedOut);
        f.collapse();
        assert!(f.hidden);
        f.restore_layout();
        assert_eq!(f.style, FormStyle::Default);
    }
}
