use coverdeck_core::input::{Axis, Button, InputEvent};

/// Stick deflection that counts as a direction.
const AXIS_THRESHOLD: f32 = 0.5;

/// What the kiosk should do in response to input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KioskCommand {
    Quit,
    Shutdown,
    ZoomIn,
    ZoomOut,
    NavigateLeft,
    NavigateRight,
    Launch,
}

/// Turns backend input events into kiosk commands.
///
/// Keyboard presses map one to one. The joystick keeps the last reported
/// stick position: a held horizontal deflection keeps navigating (see
/// [`InputMapper::held`]) and button 0 means quit, shutdown or launch
/// depending on whether the stick is held up, down or neither.
#[derive(Debug, Default)]
pub struct InputMapper {
    horizontal: f32,
    vertical: f32,
}

impl InputMapper {
    pub fn map(&mut self, event: &InputEvent) -> Option<KioskCommand> {
        match event {
            InputEvent::Quit => Some(KioskCommand::Quit),
            InputEvent::ButtonPress(button) => map_button(*button),
            InputEvent::AxisMotion {
                axis: Axis::Horizontal,
                value,
            } => {
                self.horizontal = *value;
                None
            },
            InputEvent::AxisMotion {
                axis: Axis::Vertical,
                value,
            } => {
                self.vertical = *value;
                None
            },
            InputEvent::JoyButtonPress(0) => Some(self.joystick_button()),
            _ => None,
        }
    }

    /// Navigation requested by a held stick, polled once per frame.
    pub fn held(&self) -> Option<KioskCommand> {
        if self.horizontal > AXIS_THRESHOLD {
            Some(KioskCommand::NavigateRight)
        } else if self.horizontal < -AXIS_THRESHOLD {
            Some(KioskCommand::NavigateLeft)
        } else {
            None
        }
    }

    fn joystick_button(&self) -> KioskCommand {
        // SDL reports up as negative.
        if self.vertical < -AXIS_THRESHOLD {
            KioskCommand::Quit
        } else if self.vertical > AXIS_THRESHOLD {
            KioskCommand::Shutdown
        } else {
            KioskCommand::Launch
        }
    }
}

fn map_button(button: Button) -> Option<KioskCommand> {
    match button {
        Button::Cancel => Some(KioskCommand::Quit),
        Button::Power => Some(KioskCommand::Shutdown),
        Button::ZoomIn => Some(KioskCommand::ZoomIn),
        Button::ZoomOut => Some(KioskCommand::ZoomOut),
        Button::Left => Some(KioskCommand::NavigateLeft),
        Button::Right => Some(KioskCommand::NavigateRight),
        Button::Confirm => Some(KioskCommand::Launch),
        Button::Up | Button::Down => None,
    }
}
