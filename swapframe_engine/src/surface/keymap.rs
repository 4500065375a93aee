/// Keyboard translation from winit physical keys to virtual-key codes

use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};
use crate::input::KeyCode;

pub const VK_BACK: KeyCode = 0x08;
pub const VK_TAB: KeyCode = 0x09;
pub const VK_RETURN: KeyCode = 0x0D;
pub const VK_SHIFT: KeyCode = 0x10;
pub const VK_CONTROL: KeyCode = 0x11;
pub const VK_MENU: KeyCode = 0x12;
pub const VK_ESCAPE: KeyCode = 0x1B;
pub const VK_SPACE: KeyCode = 0x20;
pub const VK_PRIOR: KeyCode = 0x21;
pub const VK_NEXT: KeyCode = 0x22;
pub const VK_END: KeyCode = 0x23;
pub const VK_HOME: KeyCode = 0x24;
pub const VK_LEFT: KeyCode = 0x25;
pub const VK_UP: KeyCode = 0x26;
pub const VK_RIGHT: KeyCode = 0x27;
pub const VK_DOWN: KeyCode = 0x28;
pub const VK_INSERT: KeyCode = 0x2D;
pub const VK_DELETE: KeyCode = 0x2E;
pub const VK_F1: KeyCode = 0x70;

/// Translate a physical key into its virtual-key code
///
/// Returns `None` for keys without a code in the table.
pub fn virtual_key_code(key: PhysicalKey) -> Option<KeyCode> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };

    let letter = |offset: u8| Some(b'A' + offset);
    let digit = |offset: u8| Some(b'0' + offset);
    let function = |offset: u8| Some(VK_F1 + offset);

    match code {
        WinitKeyCode::KeyA => letter(0),
        WinitKeyCode::KeyB => letter(1),
        WinitKeyCode::KeyC => letter(2),
        WinitKeyCode::KeyD => letter(3),
        WinitKeyCode::KeyE => letter(4),
        WinitKeyCode::KeyF => letter(5),
        WinitKeyCode::KeyG => letter(6),
        WinitKeyCode::KeyH => letter(7),
        WinitKeyCode::KeyI => letter(8),
        WinitKeyCode::KeyJ => letter(9),
        WinitKeyCode::KeyK => letter(10),
        WinitKeyCode::KeyL => letter(11),
        WinitKeyCode::KeyM => letter(12),
        WinitKeyCode::KeyN => letter(13),
        WinitKeyCode::KeyO => letter(14),
        WinitKeyCode::KeyP => letter(15),
        WinitKeyCode::KeyQ => letter(16),
        WinitKeyCode::KeyR => letter(17),
        WinitKeyCode::KeyS => letter(18),
        WinitKeyCode::KeyT => letter(19),
        WinitKeyCode::KeyU => letter(20),
        WinitKeyCode::KeyV => letter(21),
        WinitKeyCode::KeyW => letter(22),
        WinitKeyCode::KeyX => letter(23),
        WinitKeyCode::KeyY => letter(24),
        WinitKeyCode::KeyZ => letter(25),

        WinitKeyCode::Digit0 => digit(0),
        WinitKeyCode::Digit1 => digit(1),
        WinitKeyCode::Digit2 => digit(2),
        WinitKeyCode::Digit3 => digit(3),
        WinitKeyCode::Digit4 => digit(4),
        WinitKeyCode::Digit5 => digit(5),
        WinitKeyCode::Digit6 => digit(6),
        WinitKeyCode::Digit7 => digit(7),
        WinitKeyCode::Digit8 => digit(8),
        WinitKeyCode::Digit9 => digit(9),

        WinitKeyCode::F1 => function(0),
        WinitKeyCode::F2 => function(1),
        WinitKeyCode::F3 => function(2),
        WinitKeyCode::F4 => function(3),
        WinitKeyCode::F5 => function(4),
        WinitKeyCode::F6 => function(5),
        WinitKeyCode::F7 => function(6),
        WinitKeyCode::F8 => function(7),
        WinitKeyCode::F9 => function(8),
        WinitKeyCode::F10 => function(9),
        WinitKeyCode::F11 => function(10),
        WinitKeyCode::F12 => function(11),

        WinitKeyCode::Backspace => Some(VK_BACK),
        WinitKeyCode::Tab => Some(VK_TAB),
        WinitKeyCode::Enter | WinitKeyCode::NumpadEnter => Some(VK_RETURN),
        WinitKeyCode::ShiftLeft | WinitKeyCode::ShiftRight => Some(VK_SHIFT),
        WinitKeyCode::ControlLeft | WinitKeyCode::ControlRight => Some(VK_CONTROL),
        WinitKeyCode::AltLeft | WinitKeyCode::AltRight => Some(VK_MENU),
        WinitKeyCode::Escape => Some(VK_ESCAPE),
        WinitKeyCode::Space => Some(VK_SPACE),
        WinitKeyCode::PageUp => Some(VK_PRIOR),
        WinitKeyCode::PageDown => Some(VK_NEXT),
        WinitKeyCode::End => Some(VK_END),
        WinitKeyCode::Home => Some(VK_HOME),
        WinitKeyCode::ArrowLeft => Some(VK_LEFT),
        WinitKeyCode::ArrowUp => Some(VK_UP),
        WinitKeyCode::ArrowRight => Some(VK_RIGHT),
        WinitKeyCode::ArrowDown => Some(VK_DOWN),
        WinitKeyCode::Insert => Some(VK_INSERT),
        WinitKeyCode::Delete => Some(VK_DELETE),
        _ => None,
    }
}

#[cfg(test)]
#[path = "keymap_tests.rs"]
mod tests;
