//! Draw-command boundary
//!
//! Level objects describe what they look like through the `Canvas` trait.
//! How commands become pixels belongs to the host application; the
//! recording `DrawList` is enough for the headless harness and tests.

pub mod color;

use glam::DVec2;

use crate::assets::{Animation, Playback};
use crate::geom::Rect;

pub use color::{Color, debug_color};

/// Sink for draw commands, in screen space
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn outline_rect(&mut self, rect: Rect, thickness: f32, color: Color);
    fn circle(&mut self, center: DVec2, radius: f32, color: Color);
    fn ellipse(&mut self, center: DVec2, radius_x: f32, radius_y: f32, color: Color);
    /// Radial gradient from `inner` at the center to `outer` at the rim
    fn radial_gradient(&mut self, center: DVec2, radius: f32, inner: Color, outer: Color);
    /// Textured quad sampling `source` out of the texture at `texture`
    fn textured(&mut self, texture: &str, source: Rect, dest: Rect, tint: Color);
}

/// A recorded draw command
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    OutlineRect {
        rect: Rect,
        thickness: f32,
        color: Color,
    },
    Circle {
        center: DVec2,
        radius: f32,
        color: Color,
    },
    Ellipse {
        center: DVec2,
        radius_x: f32,
        radius_y: f32,
        color: Color,
    },
    RadialGradient {
        center: DVec2,
        radius: f32,
        inner: Color,
        outer: Color,
    },
    Textured {
        texture: String,
        source: Rect,
        dest: Rect,
        tint: Color,
    },
}

/// Canvas that records commands in submission order
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop recorded commands, keeping the allocation for the next frame
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Canvas for DrawList {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn outline_rect(&mut self, rect: Rect, thickness: f32, color: Color) {
        self.commands.push(DrawCommand::OutlineRect {
            rect,
            thickness,
            color,
        });
    }

    fn circle(&mut self, center: DVec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn ellipse(&mut self, center: DVec2, radius_x: f32, radius_y: f32, color: Color) {
        self.commands.push(DrawCommand::Ellipse {
            center,
            radius_x,
            radius_y,
            color,
        });
    }

    fn radial_gradient(&mut self, center: DVec2, radius: f32, inner: Color, outer: Color) {
        self.commands.push(DrawCommand::RadialGradient {
            center,
            radius,
            inner,
            outer,
        });
    }

    fn textured(&mut self, texture: &str, source: Rect, dest: Rect, tint: Color) {
        self.commands.push(DrawCommand::Textured {
            texture: texture.to_string(),
            source,
            dest,
            tint,
        });
    }
}

/// Draw the current frame of `anim` stretched over `dest`
pub fn draw_animation(canvas: &mut dyn Canvas, anim: &Animation, dest: Rect, tint: Color) {
    if anim.playback() == Playback::None {
        return;
    }
    canvas.textured(anim.path(), anim.frame_rect(), dest, tint);
}

/// Draw the current frame at its natural size with the top-left corner at `pos`
pub fn draw_animation_at(canvas: &mut dyn Canvas, anim: &Animation, pos: DVec2, tint: Color) {
    let size = anim.frame_size();
    draw_animation(canvas, anim, Rect::from_pos_size(pos, size.x, size.y), tint);
}

/// Tile the current frame across `dest`, clipping the last row and column
pub fn draw_animation_tiled(canvas: &mut dyn Canvas, anim: &Animation, dest: Rect, tint: Color) {
    if anim.playback() == Playback::None {
        return;
    }
    let frame = anim.frame_rect();
    if frame.w <= 0.0 || frame.h <= 0.0 {
        return;
    }

    let mut x = dest.x;
    while x < dest.right() {
        let w = frame.w.min(dest.right() - x);
        let mut y = dest.y;
        while y < dest.bottom() {
            let h = frame.h.min(dest.bottom() - y);
            let source = Rect::new(frame.x, frame.y, w, h);
            canvas.textured(anim.path(), source, Rect::new(x, y, w, h), tint);
            y += frame.h;
        }
        x += frame.w;
    }
}
