use crate::types::{Coords, WorkoutType};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const DEFAULT_DB: &str = "mapty.db";

#[derive(Parser, Debug)]
#[command(
    name = "mapty",
    about = "Log running and cycling workouts pinned to map locations"
)]
pub struct Cli {
    /// SQLite file holding the persisted workouts.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DB, global = true)]
    pub db: PathBuf,

    /// Device position as LAT,LNG. Without it the position request fails.
    #[arg(long, value_name = "LAT,LNG", value_parser = parse_coords, allow_hyphen_values = true, global = true)]
    pub at: Option<Coords>,

    /// Behave as if the device had no geolocation at all.
    #[arg(long, global = true, conflicts_with = "at")]
    pub no_geolocation: bool,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Show stored workouts and their map markers.
    List {
        /// Print list entries as HTML.
        #[arg(long)]
        html: bool,
    },

    /// Click the map, fill in the form and submit it.
    Add {
        #[arg(value_enum)]
        kind: KindArg,

        /// Where on the map to click, as LAT,LNG.
        #[arg(long, value_name = "LAT,LNG", value_parser = parse_coords, allow_hyphen_values = true)]
        click: Coords,

        /// km
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        distance: String,

        /// min
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        duration: String,

        /// steps/min, running only
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        cadence: String,

        /// m, cycling only
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        elevation: String,
    },

    /// Click the list entry of a workout to pan the map to it.
    Goto { id: String },

    /// Forget every stored workout and start over.
    Reset,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindArg {
    Running,
    Cycling,
}

impl From<KindArg> for WorkoutType {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Running => Self::Running,
            KindArg::Cycling => Self::Cycling,
        }
    }
}

pub fn parse_coords(s: &str) -> Result<Coords, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got {s:?}"))?;

    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("bad latitude {lat:?}: {e}"))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|e| format!("bad longitude {lng:?}: {e}"))?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(format!("coordinates out of range: {lat},{lng}"));
    }

    Ok(Coords::new(lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coords_flag() {
        assert_eq!(parse_coords("48.39, -4.49"), Ok(Coords::new(48.39, -4.49)));
        assert!(parse_coords("48.39").is_err());
        assert!(parse_coords("north,west").is_err());
        assert!(parse_coords("91,0").is_err());
    }

    #[test]
    fn add_command() {
        let cli = Cli::try_parse_from([
            "mapty", "--at", "48.39,-4.49", "add", "cycling", "--click", "48.4,-4.5",
            "--distance", "27", "--duration", "95", "--elevation", "523",
        ])
        .unwrap();

        assert_eq!(cli.at, Some(Coords::new(48.39, -4.49)));
        let Some(Cmd::Add {
            kind, click, elevation, cadence, ..
        }) = cli.cmd
        else {
            panic!("expected add");
        };
        assert_eq!(kind, KindArg::Cycling);
        assert_eq!(click, Coords::new(48.4, -4.5));
        assert_eq!(elevation, "523");
        assert_eq!(cadence, "");
    }

    #[test]
    fn position_flags_conflict() {
        assert!(Cli::try_parse_from(["mapty", "--at", "1,2", "--no-geolocation"]).is_err());
    }
}
