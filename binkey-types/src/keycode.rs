use serde::{Deserialize, Serialize};
use strum::FromRepr;

use crate::modifier::HidModifiers;

// Key codes of the HID keyboard/keypad usage page used by the link
#[repr(u8)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, PartialOrd, Ord, FromRepr)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidKeyCode {
    /// Reserved, no-key.
    #[default]
    No = 0x0000,
    /// Keyboard roll over error, too many keys are pressed simultaneously, not a physical key.
    /// NKRO: n-key rollover.
    ErrorRollover = 0x0001,
    /// Keyboard post fail error, not a physical key.
    PostFail = 0x0002,
    /// An undefined error, not a physical key.
    ErrorUndefined = 0x0003,
    /// `a` and `A`
    A = 0x0004,
    /// `b` and `B`
    B = 0x0005,
    /// `c` and `C`
    C = 0x0006,
    /// `d` and `D`
    D = 0x0007,
    /// `e` and `E`
    E = 0x0008,
    /// `f` and `F`
    F = 0x0009,
    /// `g` and `G`
    G = 0x000A,
    /// `h` and `H`
    H = 0x000B,
    /// `i` and `I`
    I = 0x000C,
    /// `j` and `J`
    J = 0x000D,
    /// `k` and `K`
    K = 0x000E,
    /// `l` and `L`
    L = 0x000F,
    /// `m` and `M`
    M = 0x0010,
    /// `n` and `N`
    N = 0x0011,
    /// `o` and `O`
    O = 0x0012,
    /// `p` and `P`
    P = 0x0013,
    /// `q` and `Q`
    Q = 0x0014,
    /// `r` and `R`
    R = 0x0015,
    /// `s` and `S`
    S = 0x0016,
    /// `t` and `T`
    T = 0x0017,
    /// `u` and `U`
    U = 0x0018,
    /// `v` and `V`
    V = 0x0019,
    /// `w` and `W`
    W = 0x001A,
    /// `x` and `X`
    X = 0x001B,
    /// `y` and `Y`
    Y = 0x001C,
    /// `z` and `Z`
    Z = 0x001D,
    /// `1` and `!`
    Kc1 = 0x001E,
    /// `2` and `@`
    Kc2 = 0x001F,
    /// `3` and `#`
    Kc3 = 0x0020,
    /// `4` and `$`
    Kc4 = 0x0021,
    /// `5` and `%`
    Kc5 = 0x0022,
    /// `6` and `^`
    Kc6 = 0x0023,
    /// `7` and `&`
    Kc7 = 0x0024,
    /// `8` and `*`
    Kc8 = 0x0025,
    /// `9` and `(`
    Kc9 = 0x0026,
    /// `0` and `)`
    Kc0 = 0x0027,
    /// `Enter`
    Enter = 0x0028,
    /// `Esc`
    Escape = 0x0029,
    /// `Backspace`
    Backspace = 0x002A,
    /// `Tab`
    Tab = 0x002B,
    /// `Space`
    Space = 0x002C,
    /// `-` and `_`
    Minus = 0x002D,
    /// `=` and `+`
    Equal = 0x002E,
    /// `[` and `{`
    LeftBracket = 0x002F,
    /// `]` and `}`
    RightBracket = 0x0030,
    /// `\` and `|`
    Backslash = 0x0031,
    /// Non-US `#` and `~`
    NonusHash = 0x0032,
    /// `;` and `:`
    Semicolon = 0x0033,
    /// `'` and `"`
    Quote = 0x0034,
    /// `~` and `\``
    Grave = 0x0035,
    /// `,` and `<`
    Comma = 0x0036,
    /// `.` and `>`
    Dot = 0x0037,
    /// `/` and `?`
    Slash = 0x0038,
    /// `CapsLock`
    CapsLock = 0x0039,
    /// `F1`
    F1 = 0x003A,
    /// `F2`
    F2 = 0x003B,
    /// `F3`
    F3 = 0x003C,
    /// `F4`
    F4 = 0x003D,
    /// `F5`
    F5 = 0x003E,
    /// `F6`
    F6 = 0x003F,
    /// `F7`
    F7 = 0x0040,
    /// `F8`
    F8 = 0x0041,
    /// `F9`
    F9 = 0x0042,
    /// `F10`
    F10 = 0x0043,
    /// `F11`
    F11 = 0x0044,
    /// `F12`
    F12 = 0x0045,
    /// Print Screen
    PrintScreen = 0x0046,
    /// Scroll Lock
    ScrollLock = 0x0047,
    /// Pause
    Pause = 0x0048,
    /// Insert
    Insert = 0x0049,
    /// Home
    Home = 0x004A,
    /// Page Up
    PageUp = 0x004B,
    /// Delete
    Delete = 0x004C,
    /// End
    End = 0x004D,
    /// Page Down
    PageDown = 0x004E,
    /// Right arrow
    Right = 0x004F,
    /// Left arrow
    Left = 0x0050,
    /// Down arrow
    Down = 0x0051,
    /// Up arrow
    Up = 0x0052,
    /// Left Control
    LCtrl = 0x00E0,
    /// Left Shift
    LShift = 0x00E1,
    /// Left Alt
    LAlt = 0x00E2,
    /// Left GUI
    LGui = 0x00E3,
    /// Right Control
    RCtrl = 0x00E4,
    /// Right Shift
    RShift = 0x00E5,
    /// Right Alt
    RAlt = 0x00E6,
    /// Right GUI
    RGui = 0x00E7,
}

impl HidKeyCode {
    /// Returns `true` if the keycode is a modifier keycode
    pub fn is_modifier(self) -> bool {
        HidKeyCode::LCtrl <= self && self <= HidKeyCode::RGui
    }

    /// Returns `true` for `a`..`z`
    pub fn is_letter(self) -> bool {
        HidKeyCode::A <= self && self <= HidKeyCode::Z
    }

    /// The letter key at `index` in the alphabet, `0` is `a`.
    pub fn letter(index: u8) -> Option<Self> {
        if index < 26 {
            Self::from_repr(HidKeyCode::A as u8 + index)
        } else {
            None
        }
    }

    /// The function key `F{index + 1}`, for `index` in `0..12`.
    pub fn function_key(index: u8) -> Option<Self> {
        if index < 12 {
            Self::from_repr(HidKeyCode::F1 as u8 + index)
        } else {
            None
        }
    }

    /// Modifier bit of this key in the report's modifier byte, empty for non-modifiers.
    pub fn to_hid_modifiers(self) -> HidModifiers {
        if self.is_modifier() {
            HidModifiers::from_bits(1 << (self as u8 - HidKeyCode::LCtrl as u8))
        } else {
            HidModifiers::new()
        }
    }
}

impl From<u8> for HidKeyCode {
    fn from(value: u8) -> Self {
        Self::from_repr(value).unwrap_or(HidKeyCode::No)
    }
}

/// Resolve an ascii char on the en-us layout.
///
/// The returned bool is `true` if the keycode has to be typed with shift held.
/// Chars without a key on the layout map to [`HidKeyCode::No`].
pub fn from_ascii(ascii: u8) -> (HidKeyCode, bool) {
    match ascii {
        b'0' => (HidKeyCode::Kc0, false),
        b'1' => (HidKeyCode::Kc1, false),
        b'2' => (HidKeyCode::Kc2, false),
        b'3' => (HidKeyCode::Kc3, false),
        b'4' => (HidKeyCode::Kc4, false),
        b'5' => (HidKeyCode::Kc5, false),
        b'6' => (HidKeyCode::Kc6, false),
        b'7' => (HidKeyCode::Kc7, false),
        b'8' => (HidKeyCode::Kc8, false),
        b'9' => (HidKeyCode::Kc9, false),
        b'a' => (HidKeyCode::A, false),
        b'b' => (HidKeyCode::B, false),
        b'c' => (HidKeyCode::C, false),
        b'd' => (HidKeyCode::D, false),
        b'e' => (HidKeyCode::E, false),
        b'f' => (HidKeyCode::F, false),
        b'g' => (HidKeyCode::G, false),
        b'h' => (HidKeyCode::H, false),
        b'i' => (HidKeyCode::I, false),
        b'j' => (HidKeyCode::J, false),
        b'k' => (HidKeyCode::K, false),
        b'l' => (HidKeyCode::L, false),
        b'm' => (HidKeyCode::M, false),
        b'n' => (HidKeyCode::N, false),
        b'o' => (HidKeyCode::O, false),
        b'p' => (HidKeyCode::P, false),
        b'q' => (HidKeyCode::Q, false),
        b'r' => (HidKeyCode::R, false),
        b's' => (HidKeyCode::S, false),
        b't' => (HidKeyCode::T, false),
        b'u' => (HidKeyCode::U, false),
        b'v' => (HidKeyCode::V, false),
        b'w' => (HidKeyCode::W, false),
        b'x' => (HidKeyCode::X, false),
        b'y' => (HidKeyCode::Y, false),
        b'z' => (HidKeyCode::Z, false),
        b'A' => (HidKeyCode::A, true),
        b'B' => (HidKeyCode::B, true),
        b'C' => (HidKeyCode::C, true),
        b'D' => (HidKeyCode::D, true),
        b'E' => (HidKeyCode::E, true),
        b'F' => (HidKeyCode::F, true),
        b'G' => (HidKeyCode::G, true),
        b'H' => (HidKeyCode::H, true),
        b'I' => (HidKeyCode::I, true),
        b'J' => (HidKeyCode::J, true),
        b'K' => (HidKeyCode::K, true),
        b'L' => (HidKeyCode::L, true),
        b'M' => (HidKeyCode::M, true),
        b'N' => (HidKeyCode::N, true),
        b'O' => (HidKeyCode::O, true),
        b'P' => (HidKeyCode::P, true),
        b'Q' => (HidKeyCode::Q, true),
        b'R' => (HidKeyCode::R, true),
        b'S' => (HidKeyCode::S, true),
        b'T' => (HidKeyCode::T, true),
        b'U' => (HidKeyCode::U, true),
        b'V' => (HidKeyCode::V, true),
        b'W' => (HidKeyCode::W, true),
        b'X' => (HidKeyCode::X, true),
        b'Y' => (HidKeyCode::Y, true),
        b'Z' => (HidKeyCode::Z, true),
        b'!' => (HidKeyCode::Kc1, true),
        b'@' => (HidKeyCode::Kc2, true),
        b'#' => (HidKeyCode::Kc3, true),
        b'$' => (HidKeyCode::Kc4, true),
        b'%' => (HidKeyCode::Kc5, true),
        b'^' => (HidKeyCode::Kc6, true),
        b'&' => (HidKeyCode::Kc7, true),
        b'*' => (HidKeyCode::Kc8, true),
        b'(' => (HidKeyCode::Kc9, true),
        b')' => (HidKeyCode::Kc0, true),
        b'-' => (HidKeyCode::Minus, false),
        b'_' => (HidKeyCode::Minus, true),
        b'=' => (HidKeyCode::Equal, false),
        b'+' => (HidKeyCode::Equal, true),
        b'[' => (HidKeyCode::LeftBracket, false),
        b']' => (HidKeyCode::RightBracket, false),
        b'{' => (HidKeyCode::LeftBracket, true),
        b'}' => (HidKeyCode::RightBracket, true),
        b';' => (HidKeyCode::Semicolon, false),
        b':' => (HidKeyCode::Semicolon, true),
        b'\'' => (HidKeyCode::Quote, false),
        b'"' => (HidKeyCode::Quote, true),
        b'`' => (HidKeyCode::Grave, false),
        b'~' => (HidKeyCode::Grave, true),
        b'\\' => (HidKeyCode::Backslash, false),
        b'|' => (HidKeyCode::Backslash, true),
        b',' => (HidKeyCode::Comma, false),
        b'<' => (HidKeyCode::Comma, true),
        b'.' => (HidKeyCode::Dot, false),
        b'>' => (HidKeyCode::Dot, true),
        b'/' => (HidKeyCode::Slash, false),
        b'?' => (HidKeyCode::Slash, true),
        b' ' => (HidKeyCode::Space, false),
        b'\n' => (HidKeyCode::Enter, false),
        b'\t' => (HidKeyCode::Tab, false),
        b'\x08' => (HidKeyCode::Backspace, false),
        b'\x1B' => (HidKeyCode::Escape, false),
        b'\x7F' => (HidKeyCode::Delete, false),
        _ => (HidKeyCode::No, false),
    }
}
