//! CPC keyboard matrix layout: 10 rows of 8 columns, active-low.
//!
//! Input IDs encode the matrix position directly: `id = row * 8 + column`.
//! The joystick shares rows with the keyboard (row 9), which is why the
//! machine exposes it through the same map.

use arnold_core::core::machine::InputKey;

pub const fn key_id(row: u8, column: u8) -> u8 {
    row * 8 + column
}

pub const KEY_CURSOR_UP: u8 = key_id(0, 0);
pub const KEY_CURSOR_RIGHT: u8 = key_id(0, 1);
pub const KEY_CURSOR_DOWN: u8 = key_id(0, 2);
pub const KEY_F9: u8 = key_id(0, 3);
pub const KEY_F6: u8 = key_id(0, 4);
pub const KEY_F3: u8 = key_id(0, 5);
pub const KEY_ENTER: u8 = key_id(0, 6);
pub const KEY_F_DOT: u8 = key_id(0, 7);

pub const KEY_CURSOR_LEFT: u8 = key_id(1, 0);
pub const KEY_COPY: u8 = key_id(1, 1);
pub const KEY_F7: u8 = key_id(1, 2);
pub const KEY_F8: u8 = key_id(1, 3);
pub const KEY_F5: u8 = key_id(1, 4);
pub const KEY_F1: u8 = key_id(1, 5);
pub const KEY_F2: u8 = key_id(1, 6);
pub const KEY_F0: u8 = key_id(1, 7);

pub const KEY_CLR: u8 = key_id(2, 0);
pub const KEY_BRACKET_OPEN: u8 = key_id(2, 1);
pub const KEY_RETURN: u8 = key_id(2, 2);
pub const KEY_BRACKET_CLOSE: u8 = key_id(2, 3);
pub const KEY_F4: u8 = key_id(2, 4);
pub const KEY_SHIFT: u8 = key_id(2, 5);
pub const KEY_BACKSLASH: u8 = key_id(2, 6);
pub const KEY_CONTROL: u8 = key_id(2, 7);

pub const KEY_CARET: u8 = key_id(3, 0);
pub const KEY_MINUS: u8 = key_id(3, 1);
pub const KEY_AT: u8 = key_id(3, 2);
pub const KEY_P: u8 = key_id(3, 3);
pub const KEY_SEMICOLON: u8 = key_id(3, 4);
pub const KEY_COLON: u8 = key_id(3, 5);
pub const KEY_SLASH: u8 = key_id(3, 6);
pub const KEY_DOT: u8 = key_id(3, 7);

pub const KEY_0: u8 = key_id(4, 0);
pub const KEY_9: u8 = key_id(4, 1);
pub const KEY_O: u8 = key_id(4, 2);
pub const KEY_I: u8 = key_id(4, 3);
pub const KEY_L: u8 = key_id(4, 4);
pub const KEY_K: u8 = key_id(4, 5);
pub const KEY_M: u8 = key_id(4, 6);
pub const KEY_COMMA: u8 = key_id(4, 7);

pub const KEY_8: u8 = key_id(5, 0);
pub const KEY_7: u8 = key_id(5, 1);
pub const KEY_U: u8 = key_id(5, 2);
pub const KEY_Y: u8 = key_id(5, 3);
pub const KEY_H: u8 = key_id(5, 4);
pub const KEY_J: u8 = key_id(5, 5);
pub const KEY_N: u8 = key_id(5, 6);
pub const KEY_SPACE: u8 = key_id(5, 7);

pub const KEY_6: u8 = key_id(6, 0);
pub const KEY_5: u8 = key_id(6, 1);
pub const KEY_R: u8 = key_id(6, 2);
pub const KEY_T: u8 = key_id(6, 3);
pub const KEY_G: u8 = key_id(6, 4);
pub const KEY_F: u8 = key_id(6, 5);
pub const KEY_B: u8 = key_id(6, 6);
pub const KEY_V: u8 = key_id(6, 7);

pub const KEY_4: u8 = key_id(7, 0);
pub const KEY_3: u8 = key_id(7, 1);
pub const KEY_E: u8 = key_id(7, 2);
pub const KEY_W: u8 = key_id(7, 3);
pub const KEY_S: u8 = key_id(7, 4);
pub const KEY_D: u8 = key_id(7, 5);
pub const KEY_C: u8 = key_id(7, 6);
pub const KEY_X: u8 = key_id(7, 7);

pub const KEY_1: u8 = key_id(8, 0);
pub const KEY_2: u8 = key_id(8, 1);
pub const KEY_ESC: u8 = key_id(8, 2);
pub const KEY_Q: u8 = key_id(8, 3);
pub const KEY_TAB: u8 = key_id(8, 4);
pub const KEY_A: u8 = key_id(8, 5);
pub const KEY_CAPS_LOCK: u8 = key_id(8, 6);
pub const KEY_Z: u8 = key_id(8, 7);

pub const KEY_JOY_UP: u8 = key_id(9, 0);
pub const KEY_JOY_DOWN: u8 = key_id(9, 1);
pub const KEY_JOY_LEFT: u8 = key_id(9, 2);
pub const KEY_JOY_RIGHT: u8 = key_id(9, 3);
pub const KEY_JOY_FIRE2: u8 = key_id(9, 4);
pub const KEY_JOY_FIRE1: u8 = key_id(9, 5);
pub const KEY_JOY_FIRE3: u8 = key_id(9, 6);
pub const KEY_DEL: u8 = key_id(9, 7);

pub const CPC_INPUT_MAP: &[InputKey] = &[
    InputKey { id: KEY_CURSOR_UP, name: "Cursor Up" },
    InputKey { id: KEY_CURSOR_RIGHT, name: "Cursor Right" },
    InputKey { id: KEY_CURSOR_DOWN, name: "Cursor Down" },
    InputKey { id: KEY_CURSOR_LEFT, name: "Cursor Left" },
    InputKey { id: KEY_F0, name: "F0" },
    InputKey { id: KEY_F1, name: "F1" },
    InputKey { id: KEY_F2, name: "F2" },
    InputKey { id: KEY_F3, name: "F3" },
    InputKey { id: KEY_F4, name: "F4" },
    InputKey { id: KEY_F5, name: "F5" },
    InputKey { id: KEY_F6, name: "F6" },
    InputKey { id: KEY_F7, name: "F7" },
    InputKey { id: KEY_F8, name: "F8" },
    InputKey { id: KEY_F9, name: "F9" },
    InputKey { id: KEY_F_DOT, name: "F." },
    InputKey { id: KEY_ENTER, name: "Enter" },
    InputKey { id: KEY_COPY, name: "Copy" },
    InputKey { id: KEY_CLR, name: "Clr" },
    InputKey { id: KEY_DEL, name: "Del" },
    InputKey { id: KEY_RETURN, name: "Return" },
    InputKey { id: KEY_SHIFT, name: "Shift" },
    InputKey { id: KEY_CONTROL, name: "Control" },
    InputKey { id: KEY_CAPS_LOCK, name: "Caps Lock" },
    InputKey { id: KEY_ESC, name: "Esc" },
    InputKey { id: KEY_TAB, name: "Tab" },
    InputKey { id: KEY_SPACE, name: "Space" },
    InputKey { id: KEY_BRACKET_OPEN, name: "[" },
    InputKey { id: KEY_BRACKET_CLOSE, name: "]" },
    InputKey { id: KEY_BACKSLASH, name: "\\" },
    InputKey { id: KEY_CARET, name: "^" },
    InputKey { id: KEY_MINUS, name: "-" },
    InputKey { id: KEY_AT, name: "@" },
    InputKey { id: KEY_SEMICOLON, name: ";" },
    InputKey { id: KEY_COLON, name: ":" },
    InputKey { id: KEY_SLASH, name: "/" },
    InputKey { id: KEY_DOT, name: "." },
    InputKey { id: KEY_COMMA, name: "," },
    InputKey { id: KEY_0, name: "0" },
    InputKey { id: KEY_1, name: "1" },
    InputKey { id: KEY_2, name: "2" },
    InputKey { id: KEY_3, name: "3" },
    InputKey { id: KEY_4, name: "4" },
    InputKey { id: KEY_5, name: "5" },
    InputKey { id: KEY_6, name: "6" },
    InputKey { id: KEY_7, name: "7" },
    InputKey { id: KEY_8, name: "8" },
    InputKey { id: KEY_9, name: "9" },
    InputKey { id: KEY_A, name: "A" },
    InputKey { id: KEY_B, name: "B" },
    InputKey { id: KEY_C, name: "C" },
    InputKey { id: KEY_D, name: "D" },
    InputKey { id: KEY_E, name: "E" },
    InputKey { id: KEY_F, name: "F" },
    InputKey { id: KEY_G, name: "G" },
    InputKey { id: KEY_H, name: "H" },
    InputKey { id: KEY_I, name: "I" },
    InputKey { id: KEY_J, name: "J" },
    InputKey { id: KEY_K, name: "K" },
    InputKey { id: KEY_L, name: "L" },
    InputKey { id: KEY_M, name: "M" },
    InputKey { id: KEY_N, name: "N" },
    InputKey { id: KEY_O, name: "O" },
    InputKey { id: KEY_P, name: "P" },
    InputKey { id: KEY_Q, name: "Q" },
    InputKey { id: KEY_R, name: "R" },
    InputKey { id: KEY_S, name: "S" },
    InputKey { id: KEY_T, name: "T" },
    InputKey { id: KEY_U, name: "U" },
    InputKey { id: KEY_V, name: "V" },
    InputKey { id: KEY_W, name: "W" },
    InputKey { id: KEY_X, name: "X" },
    InputKey { id: KEY_Y, name: "Y" },
    InputKey { id: KEY_Z, name: "Z" },
    InputKey { id: KEY_JOY_UP, name: "Joy Up" },
    InputKey { id: KEY_JOY_DOWN, name: "Joy Down" },
    InputKey { id: KEY_JOY_LEFT, name: "Joy Left" },
    InputKey { id: KEY_JOY_RIGHT, name: "Joy Right" },
    InputKey { id: KEY_JOY_FIRE1, name: "Joy Fire 1" },
    InputKey { id: KEY_JOY_FIRE2, name: "Joy Fire 2" },
    InputKey { id: KEY_JOY_FIRE3, name: "Joy Fire 3" },
];
