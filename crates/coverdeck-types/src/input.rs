//! Platform-agnostic input event types.
//!
//! Every backend maps its native input to these enums. The launcher never
//! sees raw platform input.

/// A platform-agnostic input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A keyboard key or d-pad button pressed.
    ButtonPress(Button),
    /// A keyboard key or d-pad button released.
    ButtonRelease(Button),
    /// An analog stick axis moved. `value` is normalized to `[-1.0, 1.0]`.
    AxisMotion { axis: Axis, value: f32 },
    /// A joystick button pressed, by hardware index.
    JoyButtonPress(u8),
    /// A joystick button released, by hardware index.
    JoyButtonRelease(u8),
    /// User requested quit (window close, etc.).
    Quit,
}

/// Buttons that map across all platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Cancel,
    Power,
    ZoomIn,
    ZoomOut,
}

/// Analog stick axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}
