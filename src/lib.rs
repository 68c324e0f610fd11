// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod codec;
pub mod config;
pub mod controller;
pub mod range;

// External crate imports
use pixels::{Pixels, SurfaceTexture};
use rusttype::{Font, Scale};

// Standard library imports
use std::sync::mpsc::Receiver;
use std::time::Instant;

// Window management imports
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::codec::{normalize_360, time_to_angle};
use crate::range::normalize_day;

pub use crate::config::DialConfig;
pub use crate::controller::{DialError, DialLayout, DragMode, RangeGestureController, Vec2};
pub use crate::range::{RangeHandle, TimeOfDay, TimeRange, SECONDS_PER_DAY};

// ============================================================================
// COLOR CONFIGURATION
// ============================================================================

/// Color representation for dial elements
#[derive(Debug, Clone, Copy)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Command enum for host-driven range updates between gestures
#[derive(Debug, Clone)]
pub enum DialCommand {
    SetRange(TimeRange),
    SetStart(TimeOfDay),
    SetEnd(TimeOfDay),
}

/// Windowed time-of-day range picker - the primary public interface.
///
/// Owns the shared range cell, the gesture controller, and the software
/// renderer. `show` blocks on the window event loop; pointer input drives
/// the controller and every committed update lands in the shared cell,
/// which the host can also read or write through [`TimeDial::range_handle`].
pub struct TimeDial {
    config: DialConfig,
    value: RangeHandle,
    controller: RangeGestureController,
    on_change: Option<Box<dyn FnMut(TimeRange)>>,
}

impl TimeDial {
    /// Creates a picker over `initial`. The initial range is pulled into
    /// the allowed duration window right away.
    pub fn new(config: DialConfig, initial: TimeRange) -> Result<Self, DialError> {
        let value = RangeHandle::new(TimeRange::new(initial.start, initial.end));
        let mut controller = RangeGestureController::new(
            value.clone(),
            config.allowed_duration.clone(),
            config.quantum,
        )?;
        controller.revalidate();
        Ok(Self {
            config,
            value,
            controller,
            on_change: None,
        })
    }

    /// The shared cell holding the selection. Clones alias the same value;
    /// writes from the host are picked up on the next frame.
    pub fn range_handle(&self) -> RangeHandle {
        self.value.clone()
    }

    /// Callback fired once per frame in which the committed range changed.
    pub fn set_change_handler(&mut self, handler: impl FnMut(TimeRange) + 'static) {
        self.on_change = Some(Box::new(handler));
    }

    /// Callback fired when a committed update moves either bound by at
    /// least one quantum, for tactile or audible feedback.
    pub fn set_detent_handler(&mut self, handler: impl FnMut() + 'static) {
        self.controller.set_detent_handler(handler);
    }

    pub fn show(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.run_window(None)
    }

    pub fn show_with_commands(
        &mut self,
        receiver: Receiver<DialCommand>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.run_window(Some(receiver))
    }

    fn apply_commands(&mut self, receiver: &Receiver<DialCommand>) {
        while let Ok(command) = receiver.try_recv() {
            log::debug!("applying {command:?}");
            match command {
                DialCommand::SetRange(range) => {
                    self.value.set(TimeRange::new(range.start, range.end));
                }
                DialCommand::SetStart(t) => {
                    let mut range = self.value.get();
                    range.start = normalize_day(t);
                    self.value.set(range);
                }
                DialCommand::SetEnd(t) => {
                    let mut range = self.value.get();
                    range.end = normalize_day(t);
                    self.value.set(range);
                }
            }
            self.controller.revalidate();
        }
    }

    /// Dial geometry for the current framebuffer size. The knob track sits
    /// `dial_margin` inside the window edge.
    fn layout(&self, width: usize, height: usize) -> DialLayout {
        let radius = (width.min(height) as f64) / 2.0 - self.config.dial_margin as f64;
        DialLayout {
            center_x: width as f64 / 2.0,
            center_y: height as f64 / 2.0,
            radius,
            knob_radius: self.config.knob_radius,
        }
    }

    fn run_window(
        &mut self,
        receiver: Option<Receiver<DialCommand>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let logical_width: usize = self.config.window_width;
        let logical_height: usize = self.config.window_height;

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(
                logical_width as f64,
                logical_height as f64,
            ))
            .with_resizable(false)
            .build(&event_loop)?;

        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let frame_duration = std::time::Duration::from_secs_f64(1.0 / self.config.max_framerate);
        let mut last_frame = Instant::now();

        let mut cursor: Option<(f64, f64)> = None;
        let mut pressed = false;
        let mut last_emitted: Option<TimeRange> = None;

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        let _ = pixels.resize_buffer(new_size.width, new_size.height);
                        let _ = pixels.resize_surface(new_size.width, new_size.height);
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        cursor = Some((position.x, position.y));
                        if pressed {
                            let layout = self.layout(fb_width, fb_height);
                            self.controller
                                .drag_moved(layout.centered(position.x, position.y));
                            window_clone.request_redraw();
                        }
                    }
                    WindowEvent::MouseInput {
                        state,
                        button: MouseButton::Left,
                        ..
                    } => match state {
                        ElementState::Pressed => {
                            if let Some((x, y)) = cursor {
                                pressed = true;
                                let layout = self.layout(fb_width, fb_height);
                                self.controller.press_began(layout.centered(x, y), &layout);
                            }
                        }
                        ElementState::Released => {
                            pressed = false;
                            self.controller.drag_ended();
                            window_clone.request_redraw();
                        }
                    },
                    WindowEvent::RedrawRequested => {
                        if let Some(ref receiver) = receiver {
                            self.apply_commands(receiver);
                        }

                        let current = self.value.get();
                        if last_emitted != Some(current) {
                            last_emitted = Some(current);
                            if let Some(callback) = self.on_change.as_mut() {
                                callback(current);
                            }
                        }

                        let layout = self.layout(fb_width, fb_height);
                        let frame = pixels.frame_mut();
                        let mut canvas = Canvas::new(frame, fb_width, fb_height);
                        render_dial(&mut canvas, &self.config, &self.controller, &layout);
                        let _ = pixels.render();
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}

// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

#[derive(Clone, Debug)]
enum DrawCommand {
    Clear((u8, u8, u8)),
    Arc {
        cx: i32,
        cy: i32,
        r: i32,
        thickness: i32,
        start_angle: f64,
        arc_span: f64,
        color: (u8, u8, u8),
    },
    Band {
        cx: i32,
        cy: i32,
        radius: f64,
        half_width: f64,
        start_angle: f64,
        end_angle: f64,
        color: (u8, u8, u8),
    },
    Tick {
        cx: i32,
        cy: i32,
        r: i32,
        angle: f64,
        length: i32,
        thickness: f32,
        color: (u8, u8, u8),
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        font_size: f32,
        color: (u8, u8, u8),
    },
    Circle {
        cx: i32,
        cy: i32,
        radius: i32,
        color: (u8, u8, u8),
    },
}

struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    fn render(&self, canvas: &mut Canvas, config: &DialConfig) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => {
                    canvas.clear(*color);
                }
                DrawCommand::Arc {
                    cx,
                    cy,
                    r,
                    thickness,
                    start_angle,
                    arc_span,
                    color,
                } => {
                    render_arc_immediate(
                        canvas,
                        *cx,
                        *cy,
                        *r,
                        *thickness,
                        *start_angle,
                        *arc_span,
                        *color,
                    );
                }
                DrawCommand::Band {
                    cx,
                    cy,
                    radius,
                    half_width,
                    start_angle,
                    end_angle,
                    color,
                } => {
                    render_band_immediate(
                        canvas,
                        *cx,
                        *cy,
                        *radius,
                        *half_width,
                        *start_angle,
                        *end_angle,
                        *color,
                    );
                }
                DrawCommand::Tick {
                    cx,
                    cy,
                    r,
                    angle,
                    length,
                    thickness,
                    color,
                } => {
                    let outer_x = *cx as f64 + angle.cos() * (*r as f64 - 1.0);
                    let outer_y = *cy as f64 + angle.sin() * (*r as f64 - 1.0);
                    let inner_x = *cx as f64 + angle.cos() * (*r as f64 - *length as f64);
                    let inner_y = *cy as f64 + angle.sin() * (*r as f64 - *length as f64);
                    draw_thick_line_aa(
                        canvas.frame,
                        canvas.width,
                        inner_x.round() as i32,
                        inner_y.round() as i32,
                        outer_x.round() as i32,
                        outer_y.round() as i32,
                        *thickness,
                        color.0,
                        color.1,
                        color.2,
                    );
                }
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    font_size,
                    color,
                } => {
                    if let Some(data) = config.font_data {
                        let font = Font::try_from_vec(data.to_vec()).expect("Error loading font");
                        let scale = Scale::uniform(*font_size);
                        draw_text(
                            canvas.frame,
                            canvas.width,
                            canvas.height,
                            *x,
                            *y,
                            text,
                            &font,
                            scale,
                            *color,
                        );
                    }
                }
                DrawCommand::Circle {
                    cx,
                    cy,
                    radius,
                    color,
                } => {
                    draw_circle(
                        canvas.frame,
                        canvas.width,
                        *cx,
                        *cy,
                        *radius,
                        color.0,
                        color.1,
                        color.2,
                    );
                }
            }
        }
    }
}

// ============================================================================
// CORE DATA TYPES
// ============================================================================

struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    fn clear(&mut self, color: (u8, u8, u8)) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.0, color.1, color.2, 0xff]);
        }
    }
}

// ============================================================================
// RENDERING AND DRAWING FUNCTIONS
// ============================================================================

fn render_dial(
    canvas: &mut Canvas,
    config: &DialConfig,
    controller: &RangeGestureController,
    layout: &DialLayout,
) {
    let mut scene = Scene::new();
    scene.add_command(DrawCommand::Clear(config.background_color.as_tuple()));

    let cx = layout.center_x.round() as i32;
    let cy = layout.center_y.round() as i32;
    let face_r = (layout.radius - config.face_inset).round() as i32;
    let face = config.face_color.as_tuple();

    // Clock face ring
    scene.add_command(DrawCommand::Arc {
        cx,
        cy,
        r: face_r,
        thickness: config.face_thickness,
        start_angle: 0.0,
        arc_span: std::f64::consts::TAU,
        color: face,
    });

    // Hour ticks, minor subdivisions, and numerals
    for hour in 0..24usize {
        let angle = time_to_angle(hour as f64 * 3600.0).to_radians();
        scene.add_command(DrawCommand::Tick {
            cx,
            cy,
            r: face_r,
            angle,
            length: config.major_tick_length,
            thickness: config.major_tick_thickness,
            color: face,
        });
        for j in 1..=config.minor_ticks_per_hour {
            let fraction = hour as f64 + j as f64 / (config.minor_ticks_per_hour + 1) as f64;
            let minor_angle = time_to_angle(fraction * 3600.0).to_radians();
            scene.add_command(DrawCommand::Tick {
                cx,
                cy,
                r: face_r,
                angle: minor_angle,
                length: config.minor_tick_length,
                thickness: config.minor_tick_thickness,
                color: face,
            });
        }
        if config.font_data.is_some() && config.numeral_step > 0 && hour % config.numeral_step == 0
        {
            let label_radius =
                face_r as f64 - config.major_tick_length as f64 - config.ticks_to_numerals_distance;
            let label_x = cx as f64 + angle.cos() * label_radius;
            let label_y = cy as f64 + angle.sin() * label_radius;
            scene.add_command(DrawCommand::Text {
                x: label_x as i32,
                y: label_y as i32,
                text: format!("{hour}"),
                font_size: config.numerals_font_size,
                color: face,
            });
        }
    }

    // Selection band on the knob track
    let start_angle = normalize_360(controller.start_angle()).to_radians();
    let end_angle = normalize_360(controller.end_angle()).to_radians();
    scene.add_command(DrawCommand::Band {
        cx,
        cy,
        radius: layout.radius,
        half_width: config.band_width as f64 / 2.0,
        start_angle,
        end_angle,
        color: config.band_color.as_tuple(),
    });

    // Knobs; the end knob is drawn last, so it sits on top
    let mode = controller.drag_mode();
    for (knob_angle, knob_mode) in [
        (start_angle, DragMode::DragStart),
        (end_angle, DragMode::DragEnd),
    ] {
        let knob_x = (layout.center_x + layout.radius * knob_angle.cos()).round() as i32;
        let knob_y = (layout.center_y + layout.radius * knob_angle.sin()).round() as i32;
        let engaged = mode == Some(knob_mode) || mode == Some(DragMode::Rotate);
        let outline = if engaged {
            config.band_color.as_tuple()
        } else {
            config.knob_outline_color.as_tuple()
        };
        scene.add_command(DrawCommand::Circle {
            cx: knob_x,
            cy: knob_y,
            radius: config.knob_radius.round() as i32,
            color: outline,
        });
        scene.add_command(DrawCommand::Circle {
            cx: knob_x,
            cy: knob_y,
            radius: (config.knob_radius - 2.0).max(1.0).round() as i32,
            color: config.knob_color.as_tuple(),
        });
    }

    scene.render(canvas, config);
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

fn set_pixel(frame: &mut [u8], width: usize, x: usize, y: usize, r: u8, g: u8, b: u8, alpha: f32) {
    if x < width && y < frame.len() / (width * 4) {
        let idx = (y * width + x) * 4;
        let src = [r as f32, g as f32, b as f32, 255.0 * alpha];
        let dst = [
            frame[idx] as f32,
            frame[idx + 1] as f32,
            frame[idx + 2] as f32,
            frame[idx + 3] as f32,
        ];
        let a = src[3] / 255.0;
        let out = [
            (src[0] * a + dst[0] * (1.0 - a)).round() as u8,
            (src[1] * a + dst[1] * (1.0 - a)).round() as u8,
            (src[2] * a + dst[2] * (1.0 - a)).round() as u8,
            0xff,
        ];
        frame[idx..idx + 4].copy_from_slice(&out);
    }
}

fn draw_thick_line_aa(
    frame: &mut [u8],
    width: usize,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    thickness: f32,
    r: u8,
    g: u8,
    b: u8,
) {
    let min_x = x0.min(x1) - thickness.ceil() as i32 - 1;
    let max_x = x0.max(x1) + thickness.ceil() as i32 + 1;
    let min_y = y0.min(y1) - thickness.ceil() as i32 - 1;
    let max_y = y0.max(y1) + thickness.ceil() as i32 + 1;
    let dx = (x1 - x0) as f32;
    let dy = (y1 - y0) as f32;
    let len_sq = dx * dx + dy * dy;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f32 - x0 as f32;
            let py = y as f32 - y0 as f32;
            let t = ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0);
            let lx = x0 as f32 + t * dx;
            let ly = y0 as f32 + t * dy;
            let dist = ((lx - x as f32).powi(2) + (ly - y as f32).powi(2)).sqrt();
            let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
            if aa > 0.01 {
                set_pixel(frame, width, x as usize, y as usize, r, g, b, aa);
            }
        }
    }
}

fn draw_text(
    frame: &mut [u8],
    width: usize,
    height: usize,
    x: i32,
    y: i32,
    text: &str,
    font: &rusttype::Font,
    scale: rusttype::Scale,
    color: (u8, u8, u8),
) {
    use rusttype::{point, PositionedGlyph};
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, 0.0 + v_metrics.ascent))
        .collect();
    // Calculate bounding box for the whole string
    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    let width_px = if min_x < max_x { max_x - min_x } else { 0 };
    let height_px = if min_y < max_y { max_y - min_y } else { 0 };
    let offset_x = x - width_px / 2;
    let offset_y = y - height_px / 2;
    for glyph in glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                if px >= 0 && px < width as i32 && py >= 0 && py < height as i32 {
                    set_pixel(
                        frame,
                        width,
                        px as usize,
                        py as usize,
                        color.0,
                        color.1,
                        color.2,
                        v,
                    );
                }
            });
        }
    }
}

fn draw_circle(frame: &mut [u8], width: usize, cx: i32, cy: i32, radius: i32, r: u8, g: u8, b: u8) {
    for y in -radius..=radius {
        for x in -radius..=radius {
            let dist = ((x * x + y * y) as f64).sqrt();
            let aa = if dist > radius as f64 {
                1.0 - (dist - radius as f64).min(1.0)
            } else {
                1.0
            };
            if dist <= radius as f64 + 1.0 && aa > 0.0 {
                let px = cx + x;
                let py = cy + y;
                if px >= 0
                    && py >= 0
                    && (px as usize) < width
                    && (py as usize) < frame.len() / (width * 4)
                {
                    set_pixel(frame, width, px as usize, py as usize, r, g, b, aa as f32);
                }
            }
        }
    }
}

fn render_arc_immediate(
    canvas: &mut Canvas,
    cx: i32,
    cy: i32,
    r: i32,
    thickness: i32,
    start_angle: f64,
    arc_span: f64,
    color: (u8, u8, u8),
) {
    let end_angle = start_angle + arc_span;
    let mut start_angle = start_angle;
    let mut end_angle = end_angle;
    if start_angle < 0.0 {
        start_angle += 2.0 * std::f64::consts::PI;
    }
    if end_angle >= 2.0 * std::f64::consts::PI {
        end_angle -= 2.0 * std::f64::consts::PI;
    }

    for y in 0..canvas.height as i32 {
        for x in 0..canvas.width as i32 {
            let dx = x - cx;
            let dy = y - cy;
            let dist = ((dx * dx + dy * dy) as f64).sqrt();
            let mut angle = (dy as f64).atan2(dx as f64);
            if angle < 0.0 {
                angle += 2.0 * std::f64::consts::PI;
            }
            let in_arc = if start_angle < end_angle {
                angle >= start_angle && angle <= end_angle
            } else {
                angle >= start_angle || angle <= end_angle
            };
            if in_arc {
                let aa = if dist > r as f64 {
                    1.0 - (dist - r as f64).min(1.0)
                } else if dist < (r - thickness) as f64 {
                    1.0 - ((r - thickness) as f64 - dist).min(1.0)
                } else {
                    1.0
                };
                if dist >= (r - thickness - 1) as f64 && dist <= (r + 1) as f64 && aa > 0.0 {
                    set_pixel(
                        canvas.frame,
                        canvas.width,
                        x as usize,
                        y as usize,
                        color.0,
                        color.1,
                        color.2,
                        aa as f32,
                    );
                }
            }
        }
    }
}

/// Angular falloff at the band edges, in radians.
const BAND_EDGE_SOFTNESS: f64 = 0.005;

fn render_band_immediate(
    canvas: &mut Canvas,
    cx: i32,
    cy: i32,
    radius: f64,
    half_width: f64,
    start_angle: f64,
    end_angle: f64,
    color: (u8, u8, u8),
) {
    let band_inner_radius = (radius - half_width).max(0.0);
    let band_outer_radius = radius + half_width;

    for y in 0..canvas.height as i32 {
        for x in 0..canvas.width as i32 {
            let dx = x - cx;
            let dy = y - cy;
            let dist = ((dx * dx + dy * dy) as f64).sqrt();
            let mut angle = (dy as f64).atan2(dx as f64);
            if angle < 0.0 {
                angle += 2.0 * std::f64::consts::PI;
            }

            // Angular distance to the band edges for anti-aliasing; the
            // wrap branch covers a selection crossing the zero angle.
            let mut angular_alpha = 1.0;
            if start_angle <= end_angle {
                if angle < start_angle {
                    angular_alpha =
                        1.0 - ((start_angle - angle).min(BAND_EDGE_SOFTNESS) / BAND_EDGE_SOFTNESS);
                } else if angle > end_angle {
                    angular_alpha =
                        1.0 - ((angle - end_angle).min(BAND_EDGE_SOFTNESS) / BAND_EDGE_SOFTNESS);
                }
                if angle < start_angle || angle > end_angle {
                    angular_alpha = angular_alpha.max(0.0);
                }
            } else if angle > end_angle && angle < start_angle {
                let dist_to_start = start_angle - angle;
                let dist_to_end = angle - end_angle;
                let min_dist = dist_to_start.min(dist_to_end);
                angular_alpha =
                    (1.0 - min_dist.min(BAND_EDGE_SOFTNESS) / BAND_EDGE_SOFTNESS).max(0.0);
            }

            let radial_alpha = if dist < band_inner_radius - 1.0 {
                0.0
            } else if dist < band_inner_radius + 1.0 {
                ((dist - (band_inner_radius - 1.0)) / 2.0).clamp(0.0, 1.0)
            } else if dist <= band_outer_radius - 1.0 {
                1.0
            } else if dist <= band_outer_radius + 1.0 {
                1.0 - ((dist - (band_outer_radius - 1.0)) / 2.0).clamp(0.0, 1.0)
            } else {
                0.0
            };

            let final_alpha = (angular_alpha * radial_alpha).clamp(0.0, 1.0);
            if final_alpha > 0.01 {
                set_pixel(
                    canvas.frame,
                    canvas.width,
                    x as usize,
                    y as usize,
                    color.0,
                    color.1,
                    color.2,
                    final_alpha as f32,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn dial() -> TimeDial {
        TimeDial::new(
            DialConfig::builder().build(),
            TimeRange::new(79_200.0, 21_600.0),
        )
        .unwrap()
    }

    #[test]
    fn commands_update_the_bound_range() {
        let mut dial = dial();
        let (sender, receiver) = mpsc::channel();
        sender
            .send(DialCommand::SetRange(TimeRange::new(28_800.0, 36_000.0)))
            .unwrap();
        dial.apply_commands(&receiver);
        assert_eq!(
            dial.range_handle().get(),
            TimeRange::new(28_800.0, 36_000.0)
        );
    }

    #[test]
    fn command_writes_are_revalidated() {
        // Ten minutes is under the one-hour minimum span.
        let mut dial = dial();
        let (sender, receiver) = mpsc::channel();
        sender
            .send(DialCommand::SetRange(TimeRange::new(21_600.0, 22_200.0)))
            .unwrap();
        dial.apply_commands(&receiver);
        assert_eq!(
            dial.range_handle().get(),
            TimeRange::new(21_600.0, 25_200.0)
        );
    }

    #[test]
    fn single_bound_commands_keep_the_other_bound() {
        let mut dial = dial();
        let (sender, receiver) = mpsc::channel();
        sender.send(DialCommand::SetStart(72_000.0)).unwrap();
        dial.apply_commands(&receiver);
        let range = dial.range_handle().get();
        assert_eq!(range.start, 72_000.0);
        assert_eq!(range.end, 21_600.0);
    }

    #[test]
    fn construction_enforces_the_duration_window() {
        let dial = TimeDial::new(
            DialConfig::builder().build(),
            TimeRange::new(21_600.0, 21_900.0),
        )
        .unwrap();
        assert_eq!(dial.range_handle().get().duration(), 3600.0);
    }
}
