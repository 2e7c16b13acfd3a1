/// Describes a single key or button position a machine accepts.
pub struct InputKey {
    /// Machine-defined identifier, passed to `set_input()`.
    pub id: u8,
    /// Human-readable name for display/configuration (e.g., "Copy", "F0").
    pub name: &'static str,
}

/// Machine-agnostic interface for emulated systems.
///
/// Each machine model implements this trait to provide a uniform interface
/// for the frontend. The frontend is a pure rendering engine that does not
/// know about specific hardware (CRTC registers, palette formats, keyboard
/// matrix layouts, etc.).
pub trait Machine {
    /// Native display resolution as (width, height) in pixels.
    fn display_size(&self) -> (u32, u32);

    /// Run one frame of emulation (advance the master clock until the video
    /// circuit signals frame completion).
    fn run_frame(&mut self);

    /// Render the current video state into an RGB24 pixel buffer.
    ///
    /// The buffer must be at least `width * height * 3` bytes (from `display_size()`).
    /// Pixels are stored left-to-right, top-to-bottom, 3 bytes per pixel (R, G, B).
    fn render_frame(&self, buffer: &mut [u8]);

    /// Handle an input event. `key` is a machine-defined ID from `input_map()`.
    /// `pressed` is true for key-down, false for key-up.
    ///
    /// Called per-event, not per-frame. Each call latches the key state so
    /// that `run_frame()` sees the accumulated input.
    fn set_input(&mut self, key: u8, pressed: bool);

    /// Get the list of input keys this machine accepts.
    /// The frontend uses this to build key mappings.
    fn input_map(&self) -> &[InputKey];

    /// Reset the machine to its initial power-on state. Loaded ROM images
    /// and inserted media are preserved.
    fn reset(&mut self);

    /// Drain queued audio into `buffer` (interleaved stereo, signed 16-bit).
    /// Returns the number of samples written.
    fn fill_audio(&mut self, buffer: &mut [i16]) -> usize;

    /// Audio output sample rate in Hz (0 = machine has no audio).
    fn audio_sample_rate(&self) -> u32;

    /// Nominal frame rate of the emulated video standard.
    fn frame_rate_hz(&self) -> f64;
}
