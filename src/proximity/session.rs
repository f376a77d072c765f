use bevy::log::{debug, warn};

use super::{ClickKind, ProximityEvent, ShapeIndex};
use crate::{
    error::Result,
    geometry::snap,
    projection::MapProjector,
    types::{Coord, Shape, ShapeId, SnapResult},
};

/// Where the pointer stands relative to the registered shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TrackingState {
    /// No shape within tolerance.
    #[default]
    Idle,
    /// The pointer is within tolerance of this shape.
    Tracking(Shape),
}

/// Proximity state of one map: the registered shapes, the tolerance buffer
/// and the shape the pointer was last close to.
///
/// The registered set only ever holds leaf shapes, in registration order.
#[derive(Debug, Default)]
pub struct ProximitySession {
    shapes: Vec<Shape>,
    index: ShapeIndex,
    tolerance_buffer: f64,
    state: TrackingState,
}

impl ProximitySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every leaf of `shape`. Returns how many were newly added.
    ///
    /// A shape with a non-finite coordinate or a bad circle radius anywhere
    /// below it is rejected as a whole and nothing is registered.
    pub fn register(&mut self, shape: &Shape) -> Result<usize> {
        shape.validate()?;
        let mut added = 0;
        for leaf in shape.leaves() {
            if self.contains(leaf.id()) {
                continue;
            }
            self.index.insert(&leaf);
            self.shapes.push(leaf);
            added += 1;
        }
        debug!("Registered {} shape(s), {} tracked", added, self.shapes.len());
        Ok(added)
    }

    /// Unregisters every leaf of `shape` and drops back to [`TrackingState::Idle`]
    /// without emitting anything. Returns how many were removed.
    pub fn unregister(&mut self, shape: &Shape) -> usize {
        let mut removed = 0;
        for leaf in shape.leaves() {
            if let Some(position) = self.shapes.iter().position(|s| s.id() == leaf.id()) {
                let registered = self.shapes.remove(position);
                self.index.remove(&registered);
                removed += 1;
            }
        }
        self.state = TrackingState::Idle;
        debug!("Unregistered {} shape(s), {} tracked", removed, self.shapes.len());
        removed
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.iter().any(|shape| shape.id() == id)
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn state(&self) -> &TrackingState {
        &self.state
    }

    pub fn tracked(&self) -> Option<&Shape> {
        match &self.state {
            TrackingState::Idle => None,
            TrackingState::Tracking(shape) => Some(shape),
        }
    }

    /// Forgets the tracked shape.
    pub fn reset(&mut self) {
        self.state = TrackingState::Idle;
    }

    /// Map-unit span of the pixel tolerance at the current view.
    pub fn tolerance_buffer(&self) -> f64 {
        self.tolerance_buffer
    }

    pub fn refresh_tolerance_buffer<P: MapProjector + ?Sized>(&mut self, projector: &P, tolerance: f64) {
        self.tolerance_buffer = projector.pixel_to_geo_distance_buffer(tolerance);
        debug!("Tolerance buffer is now {}", self.tolerance_buffer);
    }

    fn query<P: MapProjector + ?Sized>(
        &self,
        projector: &P,
        point: Coord,
        tolerance: f64,
        use_index: bool,
    ) -> Option<Option<SnapResult>> {
        let result = if use_index && self.tolerance_buffer > 0.0 {
            let candidates = self.index.candidates(point, self.tolerance_buffer);
            let shapes = self.shapes.iter().filter(|shape| candidates.contains(&shape.id()));
            snap(projector, shapes, point, tolerance, false)
        } else {
            snap(projector, &self.shapes, point, tolerance, false)
        };
        match result {
            Ok(result) => Some(result),
            Err(err) => {
                warn!("Ignoring pointer at {:?}: {}", point, err);
                None
            }
        }
    }

    /// Runs one pointer sample through the state machine and returns the
    /// transitions it caused, in emission order.
    ///
    /// A sample that cannot be evaluated leaves the state untouched.
    pub fn pointer_moved<P: MapProjector + ?Sized>(
        &mut self,
        projector: &P,
        point: Coord,
        tolerance: f64,
        use_index: bool,
    ) -> Vec<ProximityEvent> {
        let Some(closest) = self.query(projector, point, tolerance, use_index) else {
            return Vec::new();
        };

        let mut events = Vec::new();
        match (closest, std::mem::take(&mut self.state)) {
            (None, TrackingState::Idle) => {}
            (None, TrackingState::Tracking(previous)) => {
                events.push(ProximityEvent::Out { shape: previous });
            }
            (Some(closest), previous) => {
                match previous {
                    TrackingState::Idle => events.push(ProximityEvent::over(&closest, point)),
                    TrackingState::Tracking(previous) if !previous.is_same(&closest.shape) => {
                        events.push(ProximityEvent::Out { shape: previous });
                        events.push(ProximityEvent::over(&closest, point));
                    }
                    TrackingState::Tracking(_) => {}
                }
                events.push(ProximityEvent::moved(&closest, point));
                self.state = TrackingState::Tracking(closest.shape);
            }
        }
        events
    }

    /// One-shot click check. Never changes the tracking state.
    pub fn clicked<P: MapProjector + ?Sized>(
        &self,
        projector: &P,
        point: Coord,
        kind: ClickKind,
        tolerance: f64,
        use_index: bool,
    ) -> Option<ProximityEvent> {
        let closest = self.query(projector, point, tolerance, use_index)??;
        Some(ProximityEvent::clicked(kind, closest, point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ProximityError, projection::FlatProjector};

    fn xy(x: f64, y: f64) -> Coord {
        Coord::new(y, x)
    }

    fn horizontal(y: f64) -> Shape {
        Shape::polyline(vec![xy(0.0, y), xy(10.0, y)])
    }

    fn kinds(events: &[ProximityEvent]) -> Vec<(&'static str, ShapeId)> {
        events.iter().map(|e| (e.kind(), e.shape().id())).collect()
    }

    #[test]
    fn register_expands_groups_and_dedups() {
        let a = horizontal(0.0);
        let b = horizontal(20.0);
        let group = Shape::group(vec![a.clone(), Shape::group(vec![b.clone()])]);
        let mut session = ProximitySession::new();
        assert_eq!(session.register(&group).unwrap(), 2);
        assert_eq!(session.register(&a).unwrap(), 0);
        assert_eq!(session.len(), 2);
        assert!(session.shapes().iter().all(|shape| !shape.is_group()));

        assert_eq!(session.unregister(&group), 2);
        assert!(session.is_empty());
    }

    #[test]
    fn malformed_shapes_are_rejected_whole() {
        let good = horizontal(0.0);
        let broken_ring = Shape::circle(xy(5.0, 5.0), f64::NAN);
        let broken_line = Shape::polyline(vec![xy(0.0, 1.0), xy(f64::INFINITY, 1.0)]);
        let mut session = ProximitySession::new();

        let err = session
            .register(&Shape::group(vec![good.clone(), broken_ring]))
            .unwrap_err();
        assert!(matches!(err, ProximityError::MalformedShape(_)));
        assert!(session.is_empty());

        let err = session.register(&broken_line).unwrap_err();
        assert!(matches!(err, ProximityError::InvalidCoordinate { .. }));
        assert_eq!(session.register(&good).unwrap(), 1);
    }

    #[test]
    fn enter_move_leave() {
        let a = horizontal(0.0);
        let mut session = ProximitySession::new();
        session.register(&a).unwrap();
        let projector = FlatProjector::default();

        let events = session.pointer_moved(&projector, xy(5.0, 1.0), 2.0, false);
        assert_eq!(kinds(&events), vec![("almost:over", a.id()), ("almost:move", a.id())]);
        let ProximityEvent::Over { point, pointer, .. } = &events[0] else {
            panic!("expected over");
        };
        assert_eq!(*point, xy(5.0, 0.0));
        assert_eq!(*pointer, xy(5.0, 1.0));
        assert_eq!(session.tracked(), Some(&a));

        let events = session.pointer_moved(&projector, xy(6.0, 1.5), 2.0, false);
        assert_eq!(kinds(&events), vec![("almost:move", a.id())]);

        let events = session.pointer_moved(&projector, xy(6.0, 5.0), 2.0, false);
        assert_eq!(kinds(&events), vec![("almost:out", a.id())]);
        assert_eq!(session.state(), &TrackingState::Idle);

        let events = session.pointer_moved(&projector, xy(6.0, 6.0), 2.0, false);
        assert!(events.is_empty());
    }

    #[test]
    fn switching_shapes_emits_out_before_over() {
        let a = horizontal(0.0);
        let b = horizontal(3.0);
        let mut session = ProximitySession::new();
        session.register(&Shape::group(vec![a.clone(), b.clone()])).unwrap();
        let projector = FlatProjector::default();

        session.pointer_moved(&projector, xy(5.0, 0.5), 2.0, false);
        let events = session.pointer_moved(&projector, xy(5.0, 2.5), 2.0, false);
        assert_eq!(
            kinds(&events),
            vec![
                ("almost:out", a.id()),
                ("almost:over", b.id()),
                ("almost:move", b.id()),
            ]
        );
        assert_eq!(session.tracked(), Some(&b));
    }

    #[test]
    fn unregister_resets_silently() {
        let a = horizontal(0.0);
        let b = horizontal(20.0);
        let mut session = ProximitySession::new();
        session.register(&a).unwrap();
        session.register(&b).unwrap();
        let projector = FlatProjector::default();
        session.pointer_moved(&projector, xy(5.0, 1.0), 2.0, false);
        assert_eq!(session.tracked(), Some(&a));

        // Even removing an untracked shape invalidates the state.
        session.unregister(&b);
        assert_eq!(session.state(), &TrackingState::Idle);

        // Back over `a` without a preceding out.
        let events = session.pointer_moved(&projector, xy(5.0, 1.0), 2.0, false);
        assert_eq!(kinds(&events), vec![("almost:over", a.id()), ("almost:move", a.id())]);

        session.unregister(&a);
        assert_eq!(session.state(), &TrackingState::Idle);
        assert!(session.pointer_moved(&projector, xy(5.0, 1.0), 2.0, false).is_empty());
    }

    #[test]
    fn clicks_do_not_touch_tracking() {
        let a = horizontal(0.0);
        let mut session = ProximitySession::new();
        session.register(&a).unwrap();
        let projector = FlatProjector::default();

        let click = session
            .clicked(&projector, xy(5.0, 1.0), ClickKind::DoubleClick, 2.0, false)
            .unwrap();
        assert_eq!(click.kind(), "almost:dblclick");
        assert_eq!(click.shape(), &a);
        assert_eq!(session.state(), &TrackingState::Idle);
        assert!(session.clicked(&projector, xy(5.0, 9.0), ClickKind::Click, 2.0, false).is_none());
    }

    #[test]
    fn invalid_pointer_preserves_state() {
        let a = horizontal(0.0);
        let mut session = ProximitySession::new();
        session.register(&a).unwrap();
        let projector = FlatProjector::default();
        session.pointer_moved(&projector, xy(5.0, 1.0), 2.0, false);

        let events = session.pointer_moved(&projector, xy(f64::NAN, 1.0), 2.0, false);
        assert!(events.is_empty());
        assert_eq!(session.tracked(), Some(&a));
    }

    #[test]
    fn spatial_index_gives_same_answers() {
        let a = horizontal(0.0);
        let b = horizontal(50.0);
        let ring = Shape::circle(xy(100.0, 100.0), 5.0);
        let mut indexed = ProximitySession::new();
        let mut plain = ProximitySession::new();
        let projector = FlatProjector::default();
        for session in [&mut indexed, &mut plain] {
            session.register(&Shape::group(vec![a.clone(), b.clone(), ring.clone()])).unwrap();
            session.refresh_tolerance_buffer(&projector, 2.0);
        }
        assert_eq!(indexed.tolerance_buffer(), 2.0);

        for query in [xy(5.0, 1.0), xy(5.0, 49.0), xy(104.0, 100.0), xy(30.0, 30.0)] {
            let with_index = indexed.pointer_moved(&projector, query, 2.0, true);
            let without = plain.pointer_moved(&projector, query, 2.0, false);
            assert_eq!(with_index, without);
        }
    }
}
