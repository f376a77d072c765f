use std::time::Duration;

use bevy::{prelude::*, window::PrimaryWindow};
use crossbeam_channel::Receiver;

use crate::{
    projection::MercatorMap,
    proximity::{MapEvent, ProximityEvent, ProximitySettings, ProximityTracker},
};

/// Two left clicks closer together than this also produce a double click.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(300);

/// Proximity tracking for the map shown by this app.
///
/// Feed it [`MapEvent`]s and read [`ProximityEvent`]s back. Shapes are added
/// through the [`MapProximity`] resource.
pub struct ProximityPlugin {
    pub settings: ProximitySettings,
    pub view: MercatorMap,
}

impl Default for ProximityPlugin {
    fn default() -> Self {
        Self {
            settings: ProximitySettings::default(),
            view: MercatorMap::default(),
        }
    }
}

#[derive(Resource, Deref, DerefMut)]
pub struct MapProximity(pub ProximityTracker<MercatorMap>);

#[derive(Resource, Deref)]
struct ProximityReceiver(Receiver<ProximityEvent>);

impl Plugin for ProximityPlugin {
    fn build(&self, app: &mut App) {
        let mut tracker = ProximityTracker::new(self.view.clone(), self.settings.clone());
        let receiver = tracker.subscribe();

        app.add_event::<MapEvent>()
            .add_event::<ProximityEvent>()
            .insert_resource(MapProximity(tracker))
            .insert_resource(ProximityReceiver(receiver))
            .add_systems(Startup, map_ready)
            .add_systems(
                Update,
                (handle_map_events, tick_throttle, forward_proximity_events).chain(),
            );
    }
}

fn map_ready(mut writer: EventWriter<MapEvent>) {
    writer.write(MapEvent::Ready);
}

fn handle_map_events(
    time: Res<Time>,
    mut events: EventReader<MapEvent>,
    mut proximity: ResMut<MapProximity>,
) {
    let now = time.elapsed();
    for event in events.read() {
        proximity.handle(now, event);
    }
}

fn tick_throttle(time: Res<Time>, mut proximity: ResMut<MapProximity>) {
    proximity.tick(time.elapsed());
}

fn forward_proximity_events(
    receiver: Res<ProximityReceiver>,
    mut writer: EventWriter<ProximityEvent>,
) {
    for event in receiver.try_iter() {
        writer.write(event);
    }
}

/// Turns cursor movement and left clicks on the primary window into
/// [`MapEvent`]s. Needs [`ProximityPlugin`] and a `Camera2d` looking at the
/// map centre.
pub struct PointerInputPlugin;

impl Plugin for PointerInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreUpdate, (cursor_moved, mouse_clicks));
    }
}

fn cursor_to_map(
    camera: &Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    proximity: &MapProximity,
    cursor: Vec2,
) -> Option<crate::types::Coord> {
    let (camera, camera_transform) = camera.single().ok()?;
    let world = camera.viewport_to_world_2d(camera_transform, cursor).ok()?;
    Some(proximity.projector().world_to_coord(world))
}

fn cursor_moved(
    mut cursor_events: EventReader<CursorMoved>,
    camera: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    proximity: Res<MapProximity>,
    mut writer: EventWriter<MapEvent>,
) {
    // Only the latest position matters; the tracker throttles anyway.
    let Some(moved) = cursor_events.read().last() else {
        return;
    };
    if let Some(point) = cursor_to_map(&camera, &proximity, moved.position) {
        writer.write(MapEvent::PointerMoved(point));
    }
}

fn mouse_clicks(
    time: Res<Time>,
    buttons: Res<ButtonInput<MouseButton>>,
    q_windows: Query<&Window, With<PrimaryWindow>>,
    camera: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    proximity: Res<MapProximity>,
    mut last_click: Local<Option<Duration>>,
    mut writer: EventWriter<MapEvent>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = q_windows.single() else {
        return;
    };
    let Some(point) = window
        .cursor_position()
        .and_then(|cursor| cursor_to_map(&camera, &proximity, cursor))
    else {
        return;
    };

    let now = time.elapsed();
    writer.write(MapEvent::Clicked(point));
    match *last_click {
        Some(previous) if now.saturating_sub(previous) <= DOUBLE_CLICK_WINDOW => {
            writer.write(MapEvent::DoubleClicked(point));
            *last_click = None;
        }
        _ => *last_click = Some(now),
    }
}
