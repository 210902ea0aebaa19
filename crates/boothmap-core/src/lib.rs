//! Boothmap Core Library
//!
//! Platform-agnostic floor plan model and interaction engine for laying out
//! exhibition booths on a venue map.

pub mod booth;
pub mod camera;
pub mod config;
pub mod editor;
pub mod event;
pub mod floor_plan;
pub mod geometry;
pub mod gesture;
pub mod grid;
pub mod input;
pub mod manipulation;
pub mod overlay;
pub mod snap;
pub mod storage;

pub use booth::{Booth, BoothPosition, BoothStats, BoothStatus};
pub use camera::Camera;
pub use config::{ConfigError, EditorConfig};
pub use editor::Editor;
pub use event::{Event, EventCatalog, EventChanges, EventError};
pub use floor_plan::FloorPlan;
pub use geometry::{Corner, NormalizedRect, angle_between, rotate_point};
pub use gesture::{Gesture, HitTarget, Subject};
pub use grid::GridLayout;
pub use input::PointerEvent;
pub use overlay::{Handle, HandleKind, RenderItem};
pub use snap::{SNAP_THRESHOLD, SnapResult, snap_to_neighbors};
pub use storage::{
    FileStorage, LayoutDocument, MemoryStorage, Storage, StorageError, events_key, layout_key,
};
