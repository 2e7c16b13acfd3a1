use std::collections::HashMap;

use arnold_core::core::machine::InputKey;
use arnold_machines::keyboard as kb;
use sdl2::keyboard::Scancode;

/// Host scancode → machine key-ID mapping.
pub struct KeyMap {
    map: HashMap<Scancode, u8>,
}

impl KeyMap {
    pub fn get(&self, scancode: Scancode) -> Option<u8> {
        self.map.get(&scancode).copied()
    }
}

/// Build the default PC-keyboard layout for the CPC matrix. Keys the host
/// keyboard cannot express directly get sensible stand-ins (F10 for `F.`,
/// End for Copy, Home for Clr).
pub fn default_key_map(_input_map: &[InputKey]) -> KeyMap {
    let mut map = HashMap::new();

    let pairs: &[(Scancode, u8)] = &[
        (Scancode::Up, kb::KEY_CURSOR_UP),
        (Scancode::Down, kb::KEY_CURSOR_DOWN),
        (Scancode::Left, kb::KEY_CURSOR_LEFT),
        (Scancode::Right, kb::KEY_CURSOR_RIGHT),
        (Scancode::F1, kb::KEY_F1),
        (Scancode::F2, kb::KEY_F2),
        (Scancode::F3, kb::KEY_F3),
        (Scancode::F4, kb::KEY_F4),
        (Scancode::F5, kb::KEY_F5),
        (Scancode::F6, kb::KEY_F6),
        (Scancode::F7, kb::KEY_F7),
        (Scancode::F8, kb::KEY_F8),
        (Scancode::F9, kb::KEY_F9),
        (Scancode::F10, kb::KEY_F_DOT),
        (Scancode::Kp0, kb::KEY_F0),
        (Scancode::KpEnter, kb::KEY_ENTER),
        (Scancode::Return, kb::KEY_RETURN),
        (Scancode::LShift, kb::KEY_SHIFT),
        (Scancode::RShift, kb::KEY_SHIFT),
        (Scancode::LCtrl, kb::KEY_CONTROL),
        (Scancode::RCtrl, kb::KEY_CONTROL),
        (Scancode::CapsLock, kb::KEY_CAPS_LOCK),
        (Scancode::Tab, kb::KEY_TAB),
        (Scancode::Space, kb::KEY_SPACE),
        (Scancode::Backspace, kb::KEY_DEL),
        (Scancode::Delete, kb::KEY_CLR),
        (Scancode::Home, kb::KEY_CLR),
        (Scancode::End, kb::KEY_COPY),
        (Scancode::LeftBracket, kb::KEY_AT),
        (Scancode::RightBracket, kb::KEY_BRACKET_OPEN),
        (Scancode::Backslash, kb::KEY_BACKSLASH),
        (Scancode::Minus, kb::KEY_MINUS),
        (Scancode::Equals, kb::KEY_CARET),
        (Scancode::Semicolon, kb::KEY_COLON),
        (Scancode::Apostrophe, kb::KEY_SEMICOLON),
        (Scancode::Comma, kb::KEY_COMMA),
        (Scancode::Period, kb::KEY_DOT),
        (Scancode::Slash, kb::KEY_SLASH),
        (Scancode::Num0, kb::KEY_0),
        (Scancode::Num1, kb::KEY_1),
        (Scancode::Num2, kb::KEY_2),
        (Scancode::Num3, kb::KEY_3),
        (Scancode::Num4, kb::KEY_4),
        (Scancode::Num5, kb::KEY_5),
        (Scancode::Num6, kb::KEY_6),
        (Scancode::Num7, kb::KEY_7),
        (Scancode::Num8, kb::KEY_8),
        (Scancode::Num9, kb::KEY_9),
        (Scancode::A, kb::KEY_A),
        (Scancode::B, kb::KEY_B),
        (Scancode::C, kb::KEY_C),
        (Scancode::D, kb::KEY_D),
        (Scancode::E, kb::KEY_E),
        (Scancode::F, kb::KEY_F),
        (Scancode::G, kb::KEY_G),
        (Scancode::H, kb::KEY_H),
        (Scancode::I, kb::KEY_I),
        (Scancode::J, kb::KEY_J),
        (Scancode::K, kb::KEY_K),
        (Scancode::L, kb::KEY_L),
        (Scancode::M, kb::KEY_M),
        (Scancode::N, kb::KEY_N),
        (Scancode::O, kb::KEY_O),
        (Scancode::P, kb::KEY_P),
        (Scancode::Q, kb::KEY_Q),
        (Scancode::R, kb::KEY_R),
        (Scancode::S, kb::KEY_S),
        (Scancode::T, kb::KEY_T),
        (Scancode::U, kb::KEY_U),
        (Scancode::V, kb::KEY_V),
        (Scancode::W, kb::KEY_W),
        (Scancode::X, kb::KEY_X),
        (Scancode::Y, kb::KEY_Y),
        (Scancode::Z, kb::KEY_Z),
        (Scancode::Escape, kb::KEY_ESC),
        (Scancode::Kp8, kb::KEY_JOY_UP),
        (Scancode::Kp2, kb::KEY_JOY_DOWN),
        (Scancode::Kp4, kb::KEY_JOY_LEFT),
        (Scancode::Kp6, kb::KEY_JOY_RIGHT),
        (Scancode::Kp5, kb::KEY_JOY_FIRE1),
        (Scancode::KpPlus, kb::KEY_JOY_FIRE2),
    ];

    for &(scancode, id) in pairs {
        map.insert(scancode, id);
    }

    KeyMap { map }
}
