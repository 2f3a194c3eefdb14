use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

use bitfield_struct::bitfield;
use serde::{Deserialize, Serialize};

use crate::keycode::HidKeyCode;

/// Modifier byte of a HID keyboard report, one bit per modifier key.
///
/// | bit7 | bit6 | bit5 | bit4 | bit3 | bit2 | bit1 | bit0 |
/// | --- | --- | --- | --- | --- | --- | --- | --- |
/// | RGUI | RALT | RSHIFT | RCTRL | LGUI | LALT | LSHIFT | LCTRL |
#[bitfield(u8, order = Lsb, defmt = cfg(feature = "defmt"))]
#[derive(Serialize, Deserialize, Eq, PartialEq)]
pub struct HidModifiers {
    #[bits(1)]
    pub left_ctrl: bool,
    #[bits(1)]
    pub left_shift: bool,
    #[bits(1)]
    pub left_alt: bool,
    #[bits(1)]
    pub left_gui: bool,
    #[bits(1)]
    pub right_ctrl: bool,
    #[bits(1)]
    pub right_shift: bool,
    #[bits(1)]
    pub right_alt: bool,
    #[bits(1)]
    pub right_gui: bool,
}

impl BitOr for HidModifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.into_bits() | rhs.into_bits())
    }
}
impl BitAnd for HidModifiers {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.into_bits() & rhs.into_bits())
    }
}
impl Not for HidModifiers {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::from_bits(!self.into_bits())
    }
}
impl BitAndAssign for HidModifiers {
    fn bitand_assign(&mut self, rhs: Self) {
        *self = *self & rhs;
    }
}
impl BitOrAssign for HidModifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

pub const LCTRL: HidModifiers = HidModifiers::new().with_left_ctrl(true);
pub const LSHIFT: HidModifiers = HidModifiers::new().with_left_shift(true);
pub const LALT: HidModifiers = HidModifiers::new().with_left_alt(true);

/// Modifier keys in report bit order, index `i` is bit `i` of [`HidModifiers`].
pub const MODIFIER_KEYS: [HidKeyCode; 8] = [
    HidKeyCode::LCtrl,
    HidKeyCode::LShift,
    HidKeyCode::LAlt,
    HidKeyCode::LGui,
    HidKeyCode::RCtrl,
    HidKeyCode::RShift,
    HidKeyCode::RAlt,
    HidKeyCode::RGui,
];

impl HidModifiers {
    /// Returns `true` if no modifier is set
    pub const fn is_empty(self) -> bool {
        self.into_bits() == 0
    }

    /// Returns `true` if every modifier of `other` is also set in `self`
    pub const fn contains(self, other: HidModifiers) -> bool {
        self.into_bits() & other.into_bits() == other.into_bits()
    }

    /// Modifier keycodes which are set, in report bit order
    pub fn keys(self) -> impl DoubleEndedIterator<Item = HidKeyCode> {
        let bits = self.into_bits();
        MODIFIER_KEYS
            .into_iter()
            .enumerate()
            .filter(move |(i, _)| bits & (1 << i) != 0)
            .map(|(_, k)| k)
    }
}
