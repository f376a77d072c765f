use bevy::prelude::Event;

use crate::types::{Coord, Shape, SnapResult};

/// Notifications the host feeds into the tracker.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    /// The map finished initialising.
    Ready,
    PointerMoved(Coord),
    Clicked(Coord),
    DoubleClicked(Coord),
    /// The view was panned or zoomed.
    ViewportChanged { center: Coord, zoom: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickKind {
    Click,
    DoubleClick,
}

/// Proximity notifications.
///
/// `point` is the snapped location on the shape, `pointer` where the pointer
/// actually was.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum ProximityEvent {
    Over { shape: Shape, point: Coord, pointer: Coord },
    Out { shape: Shape },
    Move { shape: Shape, point: Coord, pointer: Coord },
    Click { shape: Shape, point: Coord, pointer: Coord },
    DoubleClick { shape: Shape, point: Coord, pointer: Coord },
}

impl ProximityEvent {
    pub(crate) fn over(snap: &SnapResult, pointer: Coord) -> Self {
        Self::Over {
            shape: snap.shape.clone(),
            point: snap.point,
            pointer,
        }
    }

    pub(crate) fn moved(snap: &SnapResult, pointer: Coord) -> Self {
        Self::Move {
            shape: snap.shape.clone(),
            point: snap.point,
            pointer,
        }
    }

    pub(crate) fn clicked(kind: ClickKind, snap: SnapResult, pointer: Coord) -> Self {
        let SnapResult { shape, point, .. } = snap;
        match kind {
            ClickKind::Click => Self::Click { shape, point, pointer },
            ClickKind::DoubleClick => Self::DoubleClick { shape, point, pointer },
        }
    }

    /// Namespaced event kind, as delivered to the host.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Over { .. } => "almost:over",
            Self::Out { .. } => "almost:out",
            Self::Move { .. } => "almost:move",
            Self::Click { .. } => "almost:click",
            Self::DoubleClick { .. } => "almost:dblclick",
        }
    }

    pub fn shape(&self) -> &Shape {
        match self {
            Self::Over { shape, .. }
            | Self::Out { shape }
            | Self::Move { shape, .. }
            | Self::Click { shape, .. }
            | Self::DoubleClick { shape, .. } => shape,
        }
    }
}
