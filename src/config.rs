use std::ops::Range;

use bon::Builder;

use crate::Color;

/// Appearance and behavior of the dial window.
///
/// Built with the generated builder; every field has a usable default
/// except `font_data`, which stays `None` unless the host embeds a font
/// (hour numerals are skipped without one).
#[derive(Debug, Clone, Builder)]
pub struct DialConfig {
    #[builder(default = "Time Dial".to_string())]
    pub title: String,

    // Window configuration
    #[builder(default = 420)]
    pub window_width: usize,
    #[builder(default = 420)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    // Dial geometry
    #[builder(default = 48)]
    pub dial_margin: i32,
    #[builder(default = 36.0)]
    pub face_inset: f64,
    #[builder(default = 2)]
    pub face_thickness: i32,

    // Tick configuration
    #[builder(default = 10)]
    pub major_tick_length: i32,
    #[builder(default = 5)]
    pub minor_tick_length: i32,
    #[builder(default = 2.0)]
    pub major_tick_thickness: f32,
    #[builder(default = 1.0)]
    pub minor_tick_thickness: f32,
    #[builder(default = 1)]
    pub minor_ticks_per_hour: usize,

    // Hour numerals
    #[builder(default = 2)]
    pub numeral_step: usize,
    #[builder(default = 20.0)]
    pub numerals_font_size: f32,
    #[builder(default = 20.0)]
    pub ticks_to_numerals_distance: f64,

    // Selection band and knobs
    #[builder(default = 18)]
    pub band_width: i32,
    #[builder(default = 16.0)]
    pub knob_radius: f64,

    // Selection behavior
    #[builder(default = 300.0)]
    pub quantum: f64,
    #[builder(default = 3600.0..81_800.0)]
    pub allowed_duration: Range<f64>,

    // Colors
    #[builder(default = Color::new(0xf2, 0xf2, 0xf7))]
    pub background_color: Color,
    #[builder(default = Color::new(0x3a, 0x3a, 0x3c))]
    pub face_color: Color,
    #[builder(default = Color::new(0x0a, 0x84, 0xff))]
    pub band_color: Color,
    #[builder(default = Color::new(0xff, 0xff, 0xff))]
    pub knob_color: Color,
    #[builder(default = Color::new(0x8e, 0x8e, 0x93))]
    pub knob_outline_color: Color,

    // Font configuration
    pub font_data: Option<&'static [u8]>,
}
