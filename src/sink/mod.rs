//! Outbound mouse commands for the remote session.

mod record;
#[cfg(target_os = "linux")]
mod uinput;

pub use record::{RecordingSink, SinkCommand};
#[cfg(target_os = "linux")]
pub use uinput::UinputSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

impl MouseButton {
    /// Button a finger in slot `action_index` stands for in multi-finger clicks.
    pub fn for_action_index(action_index: usize) -> Self {
        if action_index == 1 {
            MouseButton::Right
        } else {
            MouseButton::Left
        }
    }
}

/// Receiver of mouse commands. Fire-and-forget: nothing is returned to the gesture core.
pub trait RemoteSessionSink {
    fn send_mouse_button_down(&mut self, button: MouseButton);

    fn send_mouse_button_up(&mut self, button: MouseButton);

    fn send_mouse_move(&mut self, dx: i16, dy: i16);

    /// Relative motion expressed against the local surface size, for hosts that
    /// position the remote cursor absolutely.
    fn send_mouse_move_as_mouse_position(
        &mut self,
        dx: i16,
        dy: i16,
        surface_width: u16,
        surface_height: u16,
    );

    fn send_mouse_high_res_scroll(&mut self, amount: i16);
}

impl<S: RemoteSessionSink + ?Sized> RemoteSessionSink for &mut S {
    fn send_mouse_button_down(&mut self, button: MouseButton) {
        (**self).send_mouse_button_down(button)
    }

    fn send_mouse_button_up(&mut self, button: MouseButton) {
        (**self).send_mouse_button_up(button)
    }

    fn send_mouse_move(&mut self, dx: i16, dy: i16) {
        (**self).send_mouse_move(dx, dy)
    }

    fn send_mouse_move_as_mouse_position(
        &mut self,
        dx: i16,
        dy: i16,
        surface_width: u16,
        surface_height: u16,
    ) {
        (**self).send_mouse_move_as_mouse_position(dx, dy, surface_width, surface_height)
    }

    fn send_mouse_high_res_scroll(&mut self, amount: i16) {
        (**self).send_mouse_high_res_scroll(amount)
    }
}

/// Clamps into the `i16` range used on the wire.
pub fn saturate_i16(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

pub fn saturate_u16(value: u32) -> u16 {
    value.min(u32::from(u16::MAX)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_slot_is_right_button() {
        assert_eq!(MouseButton::for_action_index(0), MouseButton::Left);
        assert_eq!(MouseButton::for_action_index(1), MouseButton::Right);
        assert_eq!(MouseButton::for_action_index(2), MouseButton::Left);
    }

    #[test]
    fn wire_values_saturate() {
        assert_eq!(saturate_i16(40_000), i16::MAX);
        assert_eq!(saturate_i16(-40_000), i16::MIN);
        assert_eq!(saturate_i16(-12), -12);
        assert_eq!(saturate_u16(70_000), u16::MAX);
        assert_eq!(saturate_u16(1080), 1080);
    }
}
