use crate::dlog;
use crate::form::Form;
use crate::map::{
    Geolocator, GeoError, Host, ListView, MAP_ZOOM_LEVEL, MapWidget, PanOptions, TILE_URL,
    TileLayerOptions,
};
use crate::persistence;
use crate::render::{ListEntry, popup_content, popup_options};
use crate::runtime::{Event, FORM_TRANSITION, Runtime};
use crate::store::KeyValueStore;
use crate::types::{Coords, Workout};
use anyhow::{Context, Result, bail};

/// Keeps the workout sequence, the list, the map markers and the store in step.
pub struct App<S, M, L, H> {
    store: S,
    map: M,
    list: L,
    host: H,

    workouts: Vec<Workout>,
    pending_click: Option<Coords>,
    form: Form,
    map_ready: bool,
}

impl<S, M, L, H> App<S, M, L, H>
where
    S: KeyValueStore,
    M: MapWidget,
    L: ListView,
    H: Host,
{
    pub fn new(store: S, map: M, list: L, host: H) -> Self {
        Self {
            store,
            map,
            list,
            host,
            workouts: Vec::new(),
            pending_click: None,
            form: Form::default(),
            map_ready: false,
        }
    }

    /// Ask for the device position and render whatever history is stored.
    ///
    /// The map itself only comes up once the position event is handled.
    pub fn initialize(&mut self, geo: &mut dyn Geolocator, rt: &mut Runtime) -> Result<()> {
        if geo.supported() {
            geo.request_position(rt);
        } else {
            tracing::warn!("geolocation unsupported; running without a map");
            self.host.alert(GeoError::Unsupported.user_message());
        }

        self.load_stored()
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub const fn form(&self) -> &Form {
        &self.form
    }

    pub const fn map_ready(&self) -> bool {
        self.map_ready
    }

    pub const fn pending_click(&self) -> Option<Coords> {
        self.pending_click
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn map(&self) -> &M {
        &self.map
    }

    pub const fn list(&self) -> &L {
        &self.list
    }

    pub const fn host(&self) -> &H {
        &self.host
    }

    pub fn into_parts(self) -> (S, M, L, H) {
        (self.store, self.map, self.list, self.host)
    }

    pub fn handle(&mut self, event: Event, rt: &mut Runtime) -> Result<()> {
        dlog!("event {event:?} t={:?}", rt.now());

        match event {
            Event::PositionFound(center) => self.load_map(center),
            Event::PositionFailed(e) => {
                tracing::warn!(err = %e, "no position; running without a map");
                self.host.alert(e.user_message());
                Ok(())
            }
            Event::MapClicked(coords) => {
                self.pending_click = Some(coords);
                self.form.show();
                Ok(())
            }
            Event::FieldEdited(field, value) => {
                self.form.set_field(field, value);
                Ok(())
            }
            Event::TypeChanged(ty) => {
                if ty != self.form.workout_type {
                    self.form.workout_type = ty;
                    self.form.toggle_rows();
                }
                Ok(())
            }
            Event::FormSubmitted => self.new_workout(rt),
            Event::EscapePressed => {
                self.form.escape();
                Ok(())
            }
            Event::ListClicked(id) => self.move_to_workout(id.as_deref()),
            Event::Reset => self.reset(),
            Event::CollapseForm => {
                self.form.collapse();
                rt.defer(FORM_TRANSITION, Event::RestoreFormLayout);
                Ok(())
            }
            Event::RestoreFormLayout => {
                self.form.restore_layout();
                Ok(())
            }
            Event::RenderWorkout(idx) => {
                let w = self
                    .workouts
                    .get(idx)
                    .with_context(|| format!("no workout at index {idx}"))?;
                render_marker(&mut self.map, self.map_ready, w)?;
                self.list.insert_after_form(&ListEntry::from_workout(w))
            }
        }
    }

    /// Handle queued events, letting the clock run until no timer is left.
    pub fn run_until_idle(&mut self, rt: &mut Runtime) -> Result<()> {
        loop {
            while let Some(event) = rt.next_event() {
                self.handle(event, rt)?;
            }
            match rt.next_timer_in() {
                Some(wait) => rt.advance(wait),
                None => return Ok(()),
            }
        }
    }

    fn load_map(&mut self, center: Coords) -> Result<()> {
        self.map.create_view(center, MAP_ZOOM_LEVEL)?;
        self.map
            .add_tile_layer(TILE_URL, &TileLayerOptions::default())?;
        self.map.listen_clicks()?;
        self.map_ready = true;
        tracing::info!(center = %center, zoom = MAP_ZOOM_LEVEL, "map ready");

        for w in &self.workouts {
            render_marker(&mut self.map, self.map_ready, w)?;
        }
        Ok(())
    }

    fn new_workout(&mut self, rt: &mut Runtime) -> Result<()> {
        let Some(coords) = self.pending_click else {
            bail!("form submitted without a map location");
        };

        let new = match self.form.read().validate() {
            Ok(new) => new,
            Err(e) => {
                dlog!("rejected submission input={:?}", self.form.read());
                self.host.alert(&e.to_string());
                return Ok(());
            }
        };

        let workout = new.place(coords);
        tracing::info!(
            id = %workout.id,
            kind = %workout.workout_type(),
            coords = %workout.coords,
            "workout added"
        );

        self.workouts.push(workout);
        persistence::save(&mut self.store, &self.workouts)?;

        self.form.begin_close();
        rt.defer(FORM_TRANSITION, Event::CollapseForm);
        rt.defer(
            FORM_TRANSITION,
            Event::RenderWorkout(self.workouts.len() - 1),
        );
        Ok(())
    }

    fn move_to_workout(&mut self, id: Option<&str>) -> Result<()> {
        let Some(id) = id else {
            return Ok(());
        };

        let Some(w) = self.workouts.iter_mut().find(|w| w.id == id) else {
            dlog!("list click on unknown workout id={id}");
            return Ok(());
        };

        if !self.map_ready {
            bail!("map is not initialized");
        }

        w.click();
        self.map
            .set_view(w.coords, MAP_ZOOM_LEVEL, PanOptions::default())
    }

    fn load_stored(&mut self) -> Result<()> {
        let Some(stored) = persistence::load(&self.store) else {
            dlog!("no stored workouts");
            return Ok(());
        };

        tracing::info!(count = stored.len(), "loaded stored workouts");
        self.workouts = stored;
        for w in &self.workouts {
            self.list.insert_after_form(&ListEntry::from_workout(w))?;
        }
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        persistence::reset(&mut self.store)?;
        self.host.reload();
        Ok(())
    }
}

fn render_marker<M: MapWidget>(map: &mut M, ready: bool, w: &Workout) -> Result<()> {
    if !ready {
        bail!("map is not initialized");
    }
    map.add_marker(w.coords, &popup_options(w), &popup_content(w))
}
