#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Result, bail};
use clap::Parser;
use mapty::console::{ConsoleHost, ConsoleList, ConsoleMap, FixedPosition};
use mapty::form::Field;
use mapty::runtime::{Event, Runtime};
use mapty::store::SqliteStore;
use mapty::{App, cli, utils};

#[macro_use]
extern crate mapty;

type ConsoleApp = App<SqliteStore, ConsoleMap, ConsoleList, ConsoleHost>;

fn start(store: SqliteStore, geo: &mut FixedPosition, rt: &mut Runtime) -> Result<ConsoleApp> {
    let mut app = App::new(
        store,
        ConsoleMap::default(),
        ConsoleList::default(),
        ConsoleHost::default(),
    );
    app.initialize(geo, rt)?;
    app.run_until_idle(rt)?;
    Ok(app)
}

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let mut geo = FixedPosition::from_flags(cli.at, cli.no_geolocation);
    dlog!("db={} position={geo:?}", cli.db.display());

    let mut rt = Runtime::new();
    let mut app = start(SqliteStore::open(&cli.db)?, &mut geo, &mut rt)?;

    let cmd = cli.cmd.unwrap_or(cli::Cmd::List { html: false });
    let html = matches!(cmd, cli::Cmd::List { html: true });
    match cmd {
        cli::Cmd::List { .. } => {}
        cli::Cmd::Add {
            kind,
            click,
            distance,
            duration,
            cadence,
            elevation,
        } => {
            if !app.map_ready() {
                bail!("Cannot add a workout without a map. Pass --at LAT,LNG.");
            }

            let alerts_before = app.host().alerts.len();
            rt.push(Event::MapClicked(click));
            rt.push(Event::TypeChanged(kind.into()));
            rt.push(Event::FieldEdited(Field::Distance, distance));
            rt.push(Event::FieldEdited(Field::Duration, duration));
            rt.push(Event::FieldEdited(Field::Cadence, cadence));
            rt.push(Event::FieldEdited(Field::Elevation, elevation));
            rt.push(Event::FormSubmitted);
            app.run_until_idle(&mut rt)?;

            if let Some(alert) = app.host().alerts.get(alerts_before) {
                bail!("Workout rejected: {alert}");
            }
        }
        cli::Cmd::Goto { id } => {
            if !app.workouts().iter().any(|w| w.id == id) {
                bail!("No workout with id {id}");
            }
            rt.push(Event::ListClicked(Some(id)));
            app.run_until_idle(&mut rt)?;
        }
        cli::Cmd::Reset => {
            rt.push(Event::Reset);
            app.run_until_idle(&mut rt)?;

            if app.host().reload_requested {
                let (store, ..) = app.into_parts();
                rt = Runtime::new();
                app = start(store, &mut geo, &mut rt)?;
            }
        }
    }

    print_app(&app, html);
    Ok(())
}

fn print_app(app: &ConsoleApp, html: bool) {
    let map = app.map();
    match map.center {
        Some(center) => println!("map\t{center}\tzoom={}", map.zoom),
        None => println!("map\tunavailable"),
    }
    for m in &map.markers {
        println!("marker\t{}\t{}", m.coords, m.content);
    }

    for entry in app.list().shown() {
        if html {
            print!("{}", entry.to_html());
        } else {
            println!("{}", entry.to_text());
        }
    }
}
