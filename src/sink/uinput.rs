//! Virtual relative mouse on the local machine via uinput.
//! Stands in for a remote session when the host is the machine being controlled.

use evdevil::event::{EventType, InputEvent, Key, Rel, Syn, SynEvent};
use evdevil::uinput::UinputDevice;
use evdevil::InputProp;

use super::{MouseButton, RemoteSessionSink};
use crate::error::Result;

const EV_KEY: u16 = 0x01;
const EV_REL: u16 = 0x02;

const REL_X: u16 = 0x00;
const REL_Y: u16 = 0x01;
const REL_WHEEL: u16 = 0x08;
const REL_WHEEL_HI_RES: u16 = 0x0b;

/// High-res units per legacy wheel notch.
const HI_RES_PER_NOTCH: i32 = 120;

fn key_event(code: u16, value: i32) -> InputEvent {
    InputEvent::new(EventType::from_raw(EV_KEY), code, value)
}

fn rel_event(code: u16, value: i32) -> InputEvent {
    InputEvent::new(EventType::from_raw(EV_REL), code, value)
}

fn button_code(button: MouseButton) -> u16 {
    match button {
        MouseButton::Left => Key::BTN_LEFT.raw(),
        MouseButton::Right => Key::BTN_RIGHT.raw(),
    }
}

pub struct UinputSink {
    device: UinputDevice,
    // Hi-res remainder not yet reported as a REL_WHEEL notch.
    wheel_remainder: i32,
}

impl UinputSink {
    pub fn create(name: &str) -> Result<Self> {
        // REL_WHEEL_HI_RES for smooth scroll, REL_WHEEL for clients that only read notches.
        let device = UinputDevice::builder()?
            .with_props([InputProp::POINTER])?
            .with_rel_axes([Rel::X, Rel::Y, Rel::WHEEL, Rel::WHEEL_HI_RES])?
            .with_keys([Key::BTN_LEFT, Key::BTN_RIGHT])?
            .build(name)?;
        if let Ok(sysname) = device.sysname() {
            log::info!(
                "[uinput] device created: /sys/devices/virtual/input/{}",
                sysname.to_string_lossy()
            );
        }
        Ok(Self {
            device,
            wheel_remainder: 0,
        })
    }

    fn emit(&self, mut events: Vec<InputEvent>) {
        if events.is_empty() {
            return;
        }
        events.push(SynEvent::new(Syn::REPORT).into());
        if let Err(e) = self.device.write(&events) {
            log::warn!("[uinput] dropped {} events: {}", events.len(), e);
        }
    }

    fn relative_move(&self, dx: i16, dy: i16) {
        let mut out = Vec::with_capacity(3);
        if dx != 0 {
            out.push(rel_event(REL_X, i32::from(dx)));
        }
        if dy != 0 {
            out.push(rel_event(REL_Y, i32::from(dy)));
        }
        self.emit(out);
    }
}

impl RemoteSessionSink for UinputSink {
    fn send_mouse_button_down(&mut self, button: MouseButton) {
        self.emit(vec![key_event(button_code(button), 1)]);
    }

    fn send_mouse_button_up(&mut self, button: MouseButton) {
        self.emit(vec![key_event(button_code(button), 0)]);
    }

    fn send_mouse_move(&mut self, dx: i16, dy: i16) {
        self.relative_move(dx, dy);
    }

    fn send_mouse_move_as_mouse_position(
        &mut self,
        dx: i16,
        dy: i16,
        _surface_width: u16,
        _surface_height: u16,
    ) {
        // Relative-only device: the surface size has nothing to anchor to here.
        self.relative_move(dx, dy);
    }

    fn send_mouse_high_res_scroll(&mut self, amount: i16) {
        if amount == 0 {
            return;
        }
        let amount = i32::from(amount);
        self.wheel_remainder += amount;
        let notches = self.wheel_remainder / HI_RES_PER_NOTCH;
        self.wheel_remainder -= notches * HI_RES_PER_NOTCH;

        let mut out = vec![rel_event(REL_WHEEL_HI_RES, amount)];
        if notches != 0 {
            out.push(rel_event(REL_WHEEL, notches));
        }
        self.emit(out);
    }
}
