//! World-space overlays drawn by the mod (`POST /draw`).
//!
//! Drawn shapes persist until [`DrawApi::clear`].

use glam::{DVec2, DVec3};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::ClientError;
use crate::http::HttpClient;

/// Minimum segment count the mod accepts for circles.
pub const MIN_CIRCLE_RESOLUTION: u32 = 8;

/// RGBA color with components in `0..=1`, sent as `[r, g, b, a]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

impl From<[f64; 3]> for Color {
    fn from([r, g, b]: [f64; 3]) -> Self {
        Self::rgb(r, g, b)
    }
}

impl From<[f64; 4]> for Color {
    fn from([r, g, b, a]: [f64; 4]) -> Self {
        Self::rgba(r, g, b, a)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.r, self.g, self.b, self.a].serialize(serializer)
    }
}

/// Optional presentation settings shared by the draw commands.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DrawStyle {
    pub color: Option<Color>,
    pub width: Option<f64>,
    pub sorting: Option<f64>,
    pub layer: Option<f64>,
}

impl DrawStyle {
    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_sorting(mut self, sorting: f64) -> Self {
        self.sorting = Some(sorting);
        self
    }

    pub fn with_layer(mut self, layer: f64) -> Self {
        self.layer = Some(layer);
        self
    }
}

/// Direction of the thick line that approximates a filled rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FillAxis {
    #[default]
    X,
    Y,
}

#[derive(Serialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
enum DrawCommand {
    Clear,
    Line {
        start: [f64; 3],
        end: [f64; 3],
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<Color>,
        #[serde(skip_serializing_if = "Option::is_none")]
        width: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sorting: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        layer: Option<f64>,
    },
    Circle {
        center: [f64; 2],
        radius: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        resolution: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<Color>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sorting: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        layer: Option<f64>,
    },
}

/// Corners of the axis-aligned rectangle spanned by `p0` and `p1`, at `p0`'s depth,
/// counter-clockwise from the minimum corner.
fn rect_corners(p0: DVec3, p1: DVec3) -> [DVec3; 4] {
    let min = p0.truncate().min(p1.truncate());
    let max = p0.truncate().max(p1.truncate());
    let z = p0.z;
    [
        DVec3::new(min.x, min.y, z),
        DVec3::new(max.x, min.y, z),
        DVec3::new(max.x, max.y, z),
        DVec3::new(min.x, max.y, z),
    ]
}

#[derive(Debug, Clone, Copy)]
pub struct DrawApi<'a> {
    http: &'a HttpClient,
}

impl<'a> DrawApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    fn post(&self, command: &DrawCommand) -> Result<Value, ClientError> {
        self.http.post_json("/draw", command)
    }

    /// Remove everything drawn so far.
    pub fn clear(&self) -> Result<Value, ClientError> {
        self.post(&DrawCommand::Clear)
    }

    pub fn line(&self, start: DVec3, end: DVec3, style: &DrawStyle) -> Result<Value, ClientError> {
        self.post(&DrawCommand::Line {
            start: start.to_array(),
            end: end.to_array(),
            color: style.color,
            width: style.width,
            sorting: style.sorting,
            layer: style.layer,
        })
    }

    /// Circle outline. `resolution` is raised to at least [`MIN_CIRCLE_RESOLUTION`];
    /// the style's width is not used.
    pub fn circle(
        &self,
        center: DVec2,
        radius: f64,
        resolution: Option<u32>,
        style: &DrawStyle,
    ) -> Result<Value, ClientError> {
        self.post(&DrawCommand::Circle {
            center: center.to_array(),
            radius,
            resolution: resolution.map(|r| r.max(MIN_CIRCLE_RESOLUTION)),
            color: style.color,
            sorting: style.sorting,
            layer: style.layer,
        })
    }

    /// Closed regular polygon, one line per edge. Fewer than 3 sides draws nothing.
    pub fn regular_polygon(
        &self,
        center: DVec2,
        radius: f64,
        sides: usize,
        style: &DrawStyle,
        rotation_deg: f64,
    ) -> Result<(), ClientError> {
        if sides < 3 {
            return Ok(());
        }
        let rotation = rotation_deg.to_radians();
        let vertices: Vec<DVec3> = (0..sides)
            .map(|i| {
                let angle = rotation + std::f64::consts::TAU * (i as f64 / sides as f64);
                (center + radius * DVec2::from_angle(angle)).extend(0.0)
            })
            .collect();
        for i in 0..sides {
            self.line(vertices[i], vertices[(i + 1) % sides], style)?;
        }
        Ok(())
    }

    /// Rectangle with opposite corners `p0` and `p1`.
    ///
    /// Without `fill` this draws a four-line outline and ignores the style's width.
    /// With `fill` it draws one line through the middle along the axis, as wide
    /// as the other extent (at least 1).
    pub fn rect(
        &self,
        p0: DVec3,
        p1: DVec3,
        style: &DrawStyle,
        fill: Option<FillAxis>,
    ) -> Result<(), ClientError> {
        let [a, b, c, d] = rect_corners(p0, p1);
        let Some(axis) = fill else {
            let outline = DrawStyle {
                width: None,
                ..*style
            };
            return self.outline(&[a, b, c, d], &outline);
        };

        let (start, end, width) = match axis {
            FillAxis::X => {
                let cy = (a.y + c.y) * 0.5;
                (
                    DVec3::new(a.x, cy, a.z),
                    DVec3::new(c.x, cy, a.z),
                    (c.y - a.y).max(1.0),
                )
            }
            FillAxis::Y => {
                let cx = (a.x + c.x) * 0.5;
                (
                    DVec3::new(cx, a.y, a.z),
                    DVec3::new(cx, c.y, a.z),
                    (c.x - a.x).max(1.0),
                )
            }
        };
        self.line(start, end, &style.with_width(width))?;
        Ok(())
    }

    /// Rectangle outline drawn with the style's width.
    pub fn rect_outline(&self, p0: DVec3, p1: DVec3, style: &DrawStyle) -> Result<(), ClientError> {
        self.outline(&rect_corners(p0, p1), style)
    }

    fn outline(&self, corners: &[DVec3; 4], style: &DrawStyle) -> Result<(), ClientError> {
        for i in 0..corners.len() {
            self.line(corners[i], corners[(i + 1) % corners.len()], style)?;
        }
        Ok(())
    }
}
