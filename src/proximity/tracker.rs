use std::time::Duration;

use bevy::log::{debug, info};
use crossbeam_channel::{Receiver, Sender, unbounded};

use super::{ClickKind, MapEvent, ProximityEvent, ProximitySession, ProximitySettings, Throttle};
use crate::{
    error::Result,
    projection::MapProjector,
    types::{Coord, Shape},
};

/// Lifecycle interface of a map capability.
pub trait MapHandler {
    fn enable(&mut self);
    fn disable(&mut self);
    fn enabled(&self) -> bool;
}

/// Proximity tracking for one map.
///
/// The host creates one per map with [`ProximityTracker::new`], forwards its
/// [`MapEvent`]s to [`ProximityTracker::handle`] and calls
/// [`ProximityTracker::tick`] regularly so throttled pointer samples are
/// released. Notifications go to every receiver handed out by
/// [`ProximityTracker::subscribe`].
#[derive(Debug)]
pub struct ProximityTracker<P> {
    settings: ProximitySettings,
    projector: P,
    session: ProximitySession,
    throttle: Throttle<Coord>,
    enabled: bool,
    subscribers: Vec<Sender<ProximityEvent>>,
}

impl<P: MapProjector> ProximityTracker<P> {
    /// Attaches proximity tracking to the map behind `projector`. Tracking
    /// starts right away when `settings.enabled` is set.
    pub fn new(projector: P, settings: ProximitySettings) -> Self {
        let mut tracker = Self {
            throttle: Throttle::new(settings.sampling_period()),
            settings,
            projector,
            session: ProximitySession::new(),
            enabled: false,
            subscribers: Vec::new(),
        };
        if tracker.settings.enabled {
            tracker.enable();
        }
        tracker
    }

    pub fn subscribe(&mut self) -> Receiver<ProximityEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn settings(&self) -> &ProximitySettings {
        &self.settings
    }

    pub fn projector(&self) -> &P {
        &self.projector
    }

    /// Mutable access to the projector. Send a [`MapEvent::ViewportChanged`]
    /// afterwards so the tolerance buffer follows.
    pub fn projector_mut(&mut self) -> &mut P {
        &mut self.projector
    }

    pub fn session(&self) -> &ProximitySession {
        &self.session
    }

    /// Starts tracking every leaf of `shape`. Malformed shapes are rejected.
    pub fn add_shape(&mut self, shape: &Shape) -> Result<usize> {
        self.session.register(shape)
    }

    pub fn remove_shape(&mut self, shape: &Shape) -> usize {
        self.session.unregister(shape)
    }

    /// Processes one host event. `now` is the host clock, used for throttling.
    pub fn handle(&mut self, now: Duration, event: &MapEvent) {
        match *event {
            MapEvent::Ready => self.refresh_tolerance_buffer(),
            MapEvent::ViewportChanged { center, zoom } => {
                self.projector.set_view(center, zoom);
                self.refresh_tolerance_buffer();
            }
            MapEvent::PointerMoved(point) => self.pointer_moved(now, point),
            MapEvent::Clicked(point) => self.clicked(point, ClickKind::Click),
            MapEvent::DoubleClicked(point) => self.clicked(point, ClickKind::DoubleClick),
        }
    }

    /// Releases a throttled pointer sample whose window has elapsed.
    pub fn tick(&mut self, now: Duration) {
        if let Some(point) = self.throttle.poll(now) {
            self.sample(point);
        }
    }

    fn refresh_tolerance_buffer(&mut self) {
        self.session
            .refresh_tolerance_buffer(&self.projector, self.settings.tolerance_distance);
    }

    fn pointer_moved(&mut self, now: Duration, point: Coord) {
        if !self.enabled || !self.settings.track_pointer_move {
            return;
        }
        self.tick(now);
        if let Some(point) = self.throttle.submit(now, point) {
            self.sample(point);
        }
    }

    fn sample(&mut self, point: Coord) {
        if !self.enabled {
            return;
        }
        let events = self.session.pointer_moved(
            &self.projector,
            point,
            self.settings.tolerance_distance,
            self.settings.use_spatial_index,
        );
        self.emit(events);
    }

    fn clicked(&mut self, point: Coord, kind: ClickKind) {
        if !self.enabled {
            return;
        }
        let event = self.session.clicked(
            &self.projector,
            point,
            kind,
            self.settings.tolerance_distance,
            self.settings.use_spatial_index,
        );
        self.emit(event);
    }

    fn emit(&mut self, events: impl IntoIterator<Item = ProximityEvent>) {
        for event in events {
            debug!("{} {}", event.kind(), event.shape().id());
            self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }
}

impl<P: MapProjector> MapHandler for ProximityTracker<P> {
    fn enable(&mut self) {
        if self.enabled {
            return;
        }
        self.enabled = true;
        self.refresh_tolerance_buffer();
        info!("Proximity tracking enabled, {} shape(s) registered", self.session.len());
    }

    fn disable(&mut self) {
        if !self.enabled {
            return;
        }
        self.enabled = false;
        self.throttle.cancel();
        self.session.reset();
        info!("Proximity tracking disabled");
    }

    fn enabled(&self) -> bool {
        self.enabled
    }
}
