use crate::map::PopupOptions;
use crate::types::{Workout, WorkoutType};

#[derive(Debug, Clone, PartialEq)]
pub struct Detail {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

/// One rendered row of the workout list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub id: String,
    pub workout_type: WorkoutType,
    pub title: String,
    pub details: [Detail; 4],
}

impl ListEntry {
    pub fn from_workout(w: &Workout) -> Self {
        let (sec_icon, sec_value, sec_unit) = w.secondary_stat();

        Self {
            id: w.id.clone(),
            workout_type: w.workout_type(),
            title: w.describe().to_string(),
            details: [
                Detail {
                    icon: w.icon(),
                    value: format_number(w.distance),
                    unit: "km",
                },
                Detail {
                    icon: "⏱",
                    value: format_number(w.duration),
                    unit: "min",
                },
                Detail {
                    icon: "⚡️",
                    value: format_fixed1(w.derived_metric_value()),
                    unit: w.derived_metric_label(),
                },
                Detail {
                    icon: sec_icon,
                    value: format_number(sec_value),
                    unit: sec_unit,
                },
            ],
        }
    }

    pub fn to_html(&self) -> String {
        let details: String = self
            .details
            .iter()
            .map(|d| {
                format!(
                    concat!(
                        "  <div class=\"workout__details\">\n",
                        "    <span class=\"workout__icon\">{}</span>\n",
                        "    <span class=\"workout__value\">{}</span>\n",
                        "    <span class=\"workout__unit\">{}</span>\n",
                        "  </div>\n",
                    ),
                    d.icon,
                    escape_html(&d.value),
                    d.unit
                )
            })
            .collect();

        format!(
            concat!(
                "<li class=\"workout workout--{}\" data-id=\"{}\">\n",
                "  <h2 class=\"workout__title\">{}</h2>\n",
                "{}",
                "</li>\n",
            ),
            self.workout_type,
            escape_html(&self.id),
            escape_html(&self.title),
            details
        )
    }

    /// Single-line form for terminals.
    pub fn to_text(&self) -> String {
        let stats: Vec<String> = self
            .details
            .iter()
            .map(|d| format!("{} {} {}", d.icon, d.value, d.unit))
            .collect();
        format!("[{}] {}  {}", self.id, self.title, stats.join("  "))
    }
}

pub fn popup_content(w: &Workout) -> String {
    format!("{}{}", w.icon(), w.describe())
}

pub fn popup_options(w: &Workout) -> PopupOptions {
    PopupOptions {
        max_width: 250,
        min_width: 100,
        auto_close: false,
        close_on_click: false,
        class_name: format!("{}-popup", w.workout_type()),
    }
}

/// Plain number text: integral values print without a fraction.
pub fn format_number(x: f64) -> String {
    format!("{x}")
}

/// One decimal from the exact binary value.
///
/// Only exact ties (`x * 4` an odd integer) round away from zero; everything
/// else is decided by the digits actually stored, so 1.15 prints as 1.1.
pub fn format_fixed1(x: f64) -> String {
    let quarters = x * 4.0;
    let exact_tie = quarters.is_finite() && quarters.fract() == 0.0 && quarters % 2.0 != 0.0;
    if exact_tie {
        format!("{:.1}", (x * 10.0).round() / 10.0)
    } else {
        format!("{x:.1}")
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
