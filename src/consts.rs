/// Size of the frequency transform window, in samples.
/// Must be a power of 2 for FFT. 256 samples keeps latency low and matches
/// the bar resolution the visualizer was designed around.
pub const FFT_SIZE: usize = 256;

/// Number of usable frequency bins produced by the transform.
/// A real-valued 256-point FFT yields 128 distinct magnitude bins.
pub const BIN_COUNT: usize = FFT_SIZE / 2;

/// Exponential smoothing factor applied to bin magnitudes between frames.
/// Higher = slower, smoother bars. Near 0 every frame stands alone; near 1
/// the bars barely move. At 0.8 the bars fall gently to zero when the
/// audio pauses instead of cutting off.
pub const SMOOTHING_TIME_CONSTANT: f32 = 0.8;

/// Magnitude floor in decibels. Bins at or below this level map to byte 0.
pub const MIN_DECIBELS: f32 = -100.0;

/// Magnitude ceiling in decibels. Bins at or above this level map to byte 255.
pub const MAX_DECIBELS: f32 = -30.0;

/// Bar width as a multiple of the per-bin share of the canvas width.
/// At 2.5 the full set of bars overshoots the canvas on purpose, so only
/// the lower (more interesting) part of the spectrum stays visible.
pub const BAR_WIDTH_FACTOR: f32 = 2.5;

/// Horizontal gap between adjacent bars, in pixels.
pub const BAR_GAP: f32 = 1.0;
