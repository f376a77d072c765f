use bevy::prelude::*;

use map_proximity::{
    geojson::shapes_from_file,
    interaction::{MapProximity, PointerInputPlugin, ProximityPlugin},
    projection::{MapProjector, MercatorMap},
    proximity::{MapEvent, MapHandler, ProximityEvent, ProximitySettings},
    types::{Coord, Geometry, Path, Shape},
};

fn main() {
    let settings = match std::env::var("PROXIMITY_SETTINGS") {
        Ok(json) => ProximitySettings::from_json(&json).unwrap_or_else(|err| {
            eprintln!("Ignoring PROXIMITY_SETTINGS: {err}");
            ProximitySettings::default()
        }),
        Err(_) => ProximitySettings::default(),
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Map Proximity".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .add_plugins((
            ProximityPlugin {
                settings,
                view: MercatorMap::default(),
            },
            PointerInputPlugin,
        ))
        .insert_resource(ClearColor(Color::from(Srgba {
            red: 0.9,
            green: 0.9,
            blue: 0.8,
            alpha: 1.0,
        })))
        .init_resource::<Highlighted>()
        .add_systems(Startup, setup)
        .add_systems(Update, (keyboard, log_proximity, draw_shapes))
        .run();
}

#[derive(Resource, Default)]
struct Highlighted(Option<Shape>);

fn setup(mut commands: Commands, mut proximity: ResMut<MapProximity>) {
    commands.spawn(Camera2d);

    let shapes = match std::env::args().nth(1) {
        Some(path) => match shapes_from_file(&path) {
            Ok(shapes) => shapes,
            Err(err) => {
                error!("Could not load {path}: {err}");
                demo_shapes(proximity.projector().center)
            }
        },
        None => demo_shapes(proximity.projector().center),
    };
    match proximity.add_shape(&shapes) {
        Ok(added) => info!("Tracking {added} shape(s)"),
        Err(err) => error!("Could not track shapes: {err}"),
    }
}

fn demo_shapes(center: Coord) -> Shape {
    let at = |dlat: f64, dlong: f64| Coord::new(center.lat + dlat, center.long + dlong);
    Shape::group(vec![
        Shape::polyline(vec![at(-0.004, -0.010), at(0.000, -0.002), at(0.003, 0.008)]),
        Shape::polygon(vec![
            at(0.004, -0.006),
            at(0.004, -0.001),
            at(0.007, -0.001),
            at(0.007, -0.006),
        ]),
        Shape::circle(at(-0.004, 0.006), 150.0),
        Shape::point(at(0.006, 0.006)),
    ])
}

fn keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    mut proximity: ResMut<MapProximity>,
    mut writer: EventWriter<MapEvent>,
) {
    if keys.just_pressed(KeyCode::Space) {
        if proximity.enabled() {
            proximity.disable();
        } else {
            proximity.enable();
        }
    }

    let zoom = proximity.projector().zoom;
    let delta = if keys.just_pressed(KeyCode::ArrowUp) {
        1.0
    } else if keys.just_pressed(KeyCode::ArrowDown) {
        -1.0
    } else {
        return;
    };
    writer.write(MapEvent::ViewportChanged {
        center: proximity.projector().center,
        zoom: zoom + delta,
    });
}

fn log_proximity(mut events: EventReader<ProximityEvent>, mut highlighted: ResMut<Highlighted>) {
    for event in events.read() {
        match event {
            ProximityEvent::Over { shape, point, .. } => {
                info!("{} {} at {:?}", event.kind(), shape.kind(), point.to_tuple());
                highlighted.0 = Some(shape.clone());
            }
            ProximityEvent::Out { shape } => {
                info!("{} {}", event.kind(), shape.kind());
                highlighted.0 = None;
            }
            ProximityEvent::Move { .. } => {}
            ProximityEvent::Click { shape, point, .. } | ProximityEvent::DoubleClick { shape, point, .. } => {
                info!("{} {} at {:?}", event.kind(), shape.kind(), point.to_tuple());
            }
        }
    }
}

fn flat_lines(path: &Path, out: &mut Vec<Vec<Coord>>) {
    match path {
        Path::Line(points) => out.push(points.clone()),
        Path::Nested(paths) => paths.iter().for_each(|path| flat_lines(path, out)),
    }
}

fn draw_shapes(mut gizmos: Gizmos, proximity: Res<MapProximity>, highlighted: Res<Highlighted>) {
    let view = proximity.projector();
    for shape in proximity.session().shapes() {
        let color = match &highlighted.0 {
            Some(tracked) if tracked.is_same(shape) => Color::srgb(0.9, 0.2, 0.1),
            _ => Color::srgb(0.1, 0.3, 0.8),
        };
        match shape.geometry() {
            Geometry::Circle { center, radius } => {
                let radius = view.radius_to_plane(*center, *radius, view.zoom) as f32;
                gizmos.circle_2d(view.coord_to_world(*center), radius, color);
            }
            Geometry::Point(location) => {
                gizmos.circle_2d(view.coord_to_world(*location), 4.0, color);
            }
            Geometry::Polyline(_) | Geometry::Polygon(_) => {
                let mut lines = Vec::new();
                if let Some(path) = shape.path() {
                    flat_lines(&path, &mut lines);
                }
                for line in lines {
                    gizmos.linestrip_2d(line.into_iter().map(|c| view.coord_to_world(c)), color);
                }
            }
            Geometry::Group(_) => {}
        }
    }
}
