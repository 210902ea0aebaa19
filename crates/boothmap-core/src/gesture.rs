//! Pointer gesture state.

use crate::geometry::Corner;
use kurbo::{Point, Vec2};

/// What a gesture manipulates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// A booth, by id.
    Booth(String),
    /// The layout grid.
    Grid,
}

impl Subject {
    /// The booth id, if the subject is a booth.
    pub fn booth_id(&self) -> Option<&str> {
        match self {
            Subject::Booth(id) => Some(id),
            Subject::Grid => None,
        }
    }
}

/// The one gesture in progress, from pointer down to pointer up.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Moving a subject; `offset` is pointer minus top-left at grab time.
    Dragging { subject: Subject, offset: Vec2 },
    /// Resizing a subject from one corner.
    Resizing { subject: Subject, corner: Corner },
    /// Rotating a subject about its center.
    Rotating {
        subject: Subject,
        start_angle: f64,
        start_rotation: f64,
    },
    /// Panning the view; `last` is the previous screen point.
    Panning { last: Point },
}

impl Gesture {
    /// Check if no gesture is in progress.
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// The subject being manipulated, if any.
    pub fn subject(&self) -> Option<&Subject> {
        match self {
            Gesture::Dragging { subject, .. }
            | Gesture::Resizing { subject, .. }
            | Gesture::Rotating { subject, .. } => Some(subject),
            Gesture::Idle | Gesture::Panning { .. } => None,
        }
    }

    /// Id of the booth being manipulated, if any.
    pub fn active_booth(&self) -> Option<&str> {
        self.subject().and_then(Subject::booth_id)
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Dragging { .. } => "drag",
            Gesture::Resizing { .. } => "resize",
            Gesture::Rotating { .. } => "rotate",
            Gesture::Panning { .. } => "pan",
        }
    }
}

/// What lies under the pointer, as reported by hit testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    /// Empty canvas.
    Canvas,
    /// A booth body.
    Booth(String),
    /// A booth's corner resize handle.
    ResizeHandle(String, Corner),
    /// A booth's rotation handle.
    RotateHandle(String),
    /// The grid outside any cell.
    Grid,
    /// A grid cell, by index.
    GridCell(usize),
    /// A grid corner resize handle.
    GridResizeHandle(Corner),
    /// The grid rotation handle.
    GridRotateHandle,
}
