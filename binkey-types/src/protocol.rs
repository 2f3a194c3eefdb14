//! Protocol byte map of the two-wire link.
//!
//! Every byte value belongs to at most one range, anything not claimed by a range decodes
//! to [`ProtocolByte::Unknown`].
//!
//! | Range | Meaning |
//! | --- | --- |
//! | `0x01..=0x1A` | Ctrl+letter, `a` = `0x01` |
//! | `0x20..=0x7E` | printable ascii |
//! | `0x80..=0x87` | modifier press, [`MODIFIER_KEYS`] order |
//! | `0x88..=0x8F` | modifier release, same order |
//! | `0x90..=0x9D` | navigation / editing keys, [`NAVIGATION_KEYS`] order |
//! | `0x9E` | emergency clear |
//! | `0xA0..=0xAB` | F1-F12 |
//! | `0xB0` | caps lock |
//! | `0xB1` / `0xB2` | Fn layer on / off |

use core::ops::RangeInclusive;

use crate::keycode::HidKeyCode;
use crate::modifier::MODIFIER_KEYS;

pub const CTRL_LETTER: RangeInclusive<u8> = 0x01..=0x1A;
pub const PRINTABLE: RangeInclusive<u8> = 0x20..=0x7E;
pub const MODIFIER_PRESS: RangeInclusive<u8> = 0x80..=0x87;
pub const MODIFIER_RELEASE: RangeInclusive<u8> = 0x88..=0x8F;
pub const NAVIGATION: RangeInclusive<u8> = 0x90..=0x9D;
pub const EMERGENCY_CLEAR: u8 = 0x9E;
pub const FUNCTION_KEY: RangeInclusive<u8> = 0xA0..=0xAB;
pub const CAPS_LOCK: u8 = 0xB0;
pub const LAYER_ON: u8 = 0xB1;
pub const LAYER_OFF: u8 = 0xB2;

/// Navigation and editing keys, index `i` is protocol byte `0x90 + i`.
pub const NAVIGATION_KEYS: [HidKeyCode; 14] = [
    HidKeyCode::Right,
    HidKeyCode::Left,
    HidKeyCode::Down,
    HidKeyCode::Up,
    HidKeyCode::Backspace,
    HidKeyCode::Enter,
    HidKeyCode::Tab,
    HidKeyCode::Escape,
    HidKeyCode::Delete,
    HidKeyCode::Insert,
    HidKeyCode::Home,
    HidKeyCode::End,
    HidKeyCode::PageUp,
    HidKeyCode::PageDown,
];

/// A decoded protocol byte
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolByte {
    /// Ctrl + letter, the payload is the letter key
    CtrlLetter(HidKeyCode),
    /// Printable ascii char
    Printable(u8),
    /// Press (or toggle) a modifier
    ModifierPress(HidKeyCode),
    /// Release a modifier
    ModifierRelease(HidKeyCode),
    /// Momentary navigation/editing key
    Navigation(HidKeyCode),
    /// Release everything and resync the decoder
    EmergencyClear,
    /// Function key, the payload is the index: `0` is F1, `11` is F12
    FunctionKey(u8),
    CapsLock,
    LayerOn,
    LayerOff,
    /// Not claimed by any range
    Unknown(u8),
}

impl From<u8> for ProtocolByte {
    fn from(value: u8) -> Self {
        match value {
            v if CTRL_LETTER.contains(&v) => match HidKeyCode::letter(v - CTRL_LETTER.start()) {
                Some(letter) => ProtocolByte::CtrlLetter(letter),
                None => ProtocolByte::Unknown(v),
            },
            v if PRINTABLE.contains(&v) => ProtocolByte::Printable(v),
            v if MODIFIER_PRESS.contains(&v) => {
                ProtocolByte::ModifierPress(MODIFIER_KEYS[(v - MODIFIER_PRESS.start()) as usize])
            }
            v if MODIFIER_RELEASE.contains(&v) => {
                ProtocolByte::ModifierRelease(MODIFIER_KEYS[(v - MODIFIER_RELEASE.start()) as usize])
            }
            v if NAVIGATION.contains(&v) => ProtocolByte::Navigation(NAVIGATION_KEYS[(v - NAVIGATION.start()) as usize]),
            EMERGENCY_CLEAR => ProtocolByte::EmergencyClear,
            v if FUNCTION_KEY.contains(&v) => ProtocolByte::FunctionKey(v - FUNCTION_KEY.start()),
            CAPS_LOCK => ProtocolByte::CapsLock,
            LAYER_ON => ProtocolByte::LayerOn,
            LAYER_OFF => ProtocolByte::LayerOff,
            v => ProtocolByte::Unknown(v),
        }
    }
}

impl ProtocolByte {
    /// Wire value of this protocol byte.
    ///
    /// Returns `None` if the payload is not representable, e.g. a `ModifierPress` carrying a non-modifier key.
    pub fn to_byte(self) -> Option<u8> {
        match self {
            ProtocolByte::CtrlLetter(k) if k.is_letter() => Some(CTRL_LETTER.start() + (k as u8 - HidKeyCode::A as u8)),
            ProtocolByte::Printable(c) if PRINTABLE.contains(&c) => Some(c),
            ProtocolByte::ModifierPress(k) => modifier_index(k).map(|i| MODIFIER_PRESS.start() + i),
            ProtocolByte::ModifierRelease(k) => modifier_index(k).map(|i| MODIFIER_RELEASE.start() + i),
            ProtocolByte::Navigation(k) => NAVIGATION_KEYS
                .iter()
                .position(|n| *n == k)
                .map(|i| NAVIGATION.start() + i as u8),
            ProtocolByte::EmergencyClear => Some(EMERGENCY_CLEAR),
            ProtocolByte::FunctionKey(i) if i < 12 => Some(FUNCTION_KEY.start() + i),
            ProtocolByte::CapsLock => Some(CAPS_LOCK),
            ProtocolByte::LayerOn => Some(LAYER_ON),
            ProtocolByte::LayerOff => Some(LAYER_OFF),
            ProtocolByte::Unknown(v) => Some(v),
            _ => None,
        }
    }
}

fn modifier_index(key: HidKeyCode) -> Option<u8> {
    MODIFIER_KEYS.iter().position(|m| *m == key).map(|i| i as u8)
}
