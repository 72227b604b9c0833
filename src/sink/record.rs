use super::{MouseButton, RemoteSessionSink};

/// One command as it reached the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkCommand {
    ButtonDown(MouseButton),
    ButtonUp(MouseButton),
    Move { dx: i16, dy: i16 },
    MoveAsPosition { dx: i16, dy: i16, width: u16, height: u16 },
    Scroll(i16),
}

/// Sink that keeps every command in order, for replay and inspection.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    commands: Vec<SinkCommand>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[SinkCommand] {
        &self.commands
    }

    pub fn take(&mut self) -> Vec<SinkCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn count(&self, command: SinkCommand) -> usize {
        self.commands.iter().filter(|c| **c == command).count()
    }

    /// Whether `button` ends up pressed after replaying every command.
    pub fn is_held(&self, button: MouseButton) -> bool {
        self.commands.iter().fold(false, |held, c| match c {
            SinkCommand::ButtonDown(b) if *b == button => true,
            SinkCommand::ButtonUp(b) if *b == button => false,
            _ => held,
        })
    }
}

impl RemoteSessionSink for RecordingSink {
    fn send_mouse_button_down(&mut self, button: MouseButton) {
        self.commands.push(SinkCommand::ButtonDown(button));
    }

    fn send_mouse_button_up(&mut self, button: MouseButton) {
        self.commands.push(SinkCommand::ButtonUp(button));
    }

    fn send_mouse_move(&mut self, dx: i16, dy: i16) {
        self.commands.push(SinkCommand::Move { dx, dy });
    }

    fn send_mouse_move_as_mouse_position(
        &mut self,
        dx: i16,
        dy: i16,
        surface_width: u16,
        surface_height: u16,
    ) {
        self.commands.push(SinkCommand::MoveAsPosition {
            dx,
            dy,
            width: surface_width,
            height: surface_height,
        });
    }

    fn send_mouse_high_res_scroll(&mut self, amount: i16) {
        self.commands.push(SinkCommand::Scroll(amount));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_held_state_per_button() {
        let mut sink = RecordingSink::new();
        sink.send_mouse_button_down(MouseButton::Left);
        sink.send_mouse_button_down(MouseButton::Right);
        sink.send_mouse_button_up(MouseButton::Right);
        assert!(sink.is_held(MouseButton::Left));
        assert!(!sink.is_held(MouseButton::Right));
        assert_eq!(sink.count(SinkCommand::ButtonDown(MouseButton::Left)), 1);
        assert_eq!(sink.take().len(), 3);
        assert!(sink.commands().is_empty());
    }
}
