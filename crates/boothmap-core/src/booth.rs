//! Booth entities and their on-canvas positions.

use crate::geometry::NormalizedRect;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Booking status of a booth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoothStatus {
    #[default]
    Available,
    Booked,
    Unavailable,
}

impl BoothStatus {
    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            BoothStatus::Available => "available",
            BoothStatus::Booked => "booked",
            BoothStatus::Unavailable => "unavailable",
        }
    }
}

/// A bookable exhibition space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booth {
    /// Booth identifier, shared with its [`BoothPosition`].
    pub id: String,
    /// Booking status.
    pub status: BoothStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl Booth {
    /// Create a booth with no business metadata.
    pub fn new(id: impl Into<String>, status: BoothStatus) -> Self {
        Self {
            id: id.into(),
            status,
            company: None,
            contact: None,
            price: None,
            size: None,
        }
    }

    /// Create an available booth.
    pub fn available(id: impl Into<String>) -> Self {
        Self::new(id, BoothStatus::Available)
    }

    /// Attach booking details.
    pub fn booked_by(
        mut self,
        company: impl Into<String>,
        contact: impl Into<String>,
        price: impl Into<String>,
        size: impl Into<String>,
    ) -> Self {
        self.status = BoothStatus::Booked;
        self.company = Some(company.into());
        self.contact = Some(contact.into());
        self.price = Some(price.into());
        self.size = Some(size.into());
        self
    }
}

/// The footprint of a booth on the venue map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoothPosition {
    /// Id of the booth this footprint belongs to.
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees about the footprint's center.
    #[serde(default)]
    pub rotation: f64,
}

impl BoothPosition {
    /// Create an unrotated position.
    pub fn new(id: impl Into<String>, rect: NormalizedRect) -> Self {
        Self {
            id: id.into(),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            rotation: 0.0,
        }
    }

    /// Set the rotation.
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// The unrotated rectangle.
    pub fn rect(&self) -> NormalizedRect {
        NormalizedRect::new(self.x, self.y, self.width, self.height)
    }

    /// Replace the rectangle, keeping id and rotation.
    pub fn set_rect(&mut self, rect: NormalizedRect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    /// Rotation pivot.
    pub fn center(&self) -> Point {
        self.rect().center()
    }
}

/// Occupancy figures for a set of booths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoothStats {
    pub total: usize,
    pub available: usize,
    pub booked: usize,
    pub unavailable: usize,
}

impl BoothStats {
    /// Count booths by status.
    pub fn from_booths<'a>(booths: impl IntoIterator<Item = &'a Booth>) -> Self {
        booths
            .into_iter()
            .fold(Self::default(), |mut stats, booth| {
                stats.total += 1;
                match booth.status {
                    BoothStatus::Available => stats.available += 1,
                    BoothStatus::Booked => stats.booked += 1,
                    BoothStatus::Unavailable => stats.unavailable += 1,
                }
                stats
            })
    }

    /// Booked share of all booths, rounded to a whole percent.
    pub fn occupancy_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let percent = (self.booked as f64 / self.total as f64 * 100.0).round();
        percent as u32
    }
}
