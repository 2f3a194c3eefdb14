//! Maps received protocol bytes to keyboard commands.
//!
//! The dispatcher owns the latched modifiers and the Fn layer. Every byte value yields a
//! defined, possibly empty, list of [`HidCommand`]s.

use binkey_types::keycode::{HidKeyCode, from_ascii};
use binkey_types::modifier::{HidModifiers, LCTRL, LSHIFT};
use binkey_types::protocol::ProtocolByte;
use heapless::Vec;

use crate::config::{BinkeyConfig, FnBindings, ModifierMode};
use crate::hid::HidCommand;

/// Max number of commands of one byte: all 8 modifiers wrapped around a tap
pub const MAX_COMMANDS: usize = 18;

/// Character to keycode fallback for printable chars without an explicit mapping
pub trait KeyboardLayout {
    /// Keycode of `ch` and whether shift must be held, `None` if the layout can't type it
    fn resolve(&self, ch: u8) -> Option<(HidKeyCode, bool)>;
}

/// The en-us layout
#[derive(Debug, Default, Clone, Copy)]
pub struct UsLayout;

impl KeyboardLayout for UsLayout {
    fn resolve(&self, ch: u8) -> Option<(HidKeyCode, bool)> {
        match from_ascii(ch) {
            (HidKeyCode::No, _) => None,
            resolved => Some(resolved),
        }
    }
}

/// Explicit mapping of letters, digits and space
fn resolve_char(ch: u8) -> Option<(HidKeyCode, bool)> {
    match ch {
        b'a'..=b'z' => HidKeyCode::letter(ch - b'a').map(|k| (k, false)),
        b'A'..=b'Z' => HidKeyCode::letter(ch - b'A').map(|k| (k, true)),
        b'0' => Some((HidKeyCode::Kc0, false)),
        b'1'..=b'9' => HidKeyCode::from_repr(HidKeyCode::Kc1 as u8 + (ch - b'1')).map(|k| (k, false)),
        b' ' => Some((HidKeyCode::Space, false)),
        _ => None,
    }
}

/// Result of dispatching one byte
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dispatch {
    /// Commands to execute, in order
    pub commands: Vec<HidCommand, MAX_COMMANDS>,
    /// The frame decoder must be reset before the next edge
    pub reset_requested: bool,
}

impl Dispatch {
    fn push(&mut self, command: HidCommand) {
        if self.commands.push(command).is_err() {
            error!("Too many commands for one byte, dropped {:?}", command);
        }
    }

    fn tap(&mut self, key: HidKeyCode) {
        self.push(HidCommand::Press(key));
        self.push(HidCommand::Release(key));
    }
}

pub struct ActionDispatcher<L: KeyboardLayout = UsLayout> {
    /// Modifiers held by the modifier bytes
    latched: HidModifiers,
    fn_active: bool,
    modifier_mode: ModifierMode,
    fn_layer: bool,
    fn_bindings: FnBindings,
    layout: L,
}

impl ActionDispatcher<UsLayout> {
    pub fn new(config: &BinkeyConfig) -> Self {
        Self::with_layout(config, UsLayout)
    }
}

impl<L: KeyboardLayout> ActionDispatcher<L> {
    pub fn with_layout(config: &BinkeyConfig, layout: L) -> Self {
        Self {
            latched: HidModifiers::new(),
            fn_active: false,
            modifier_mode: config.protocol.modifier_mode,
            fn_layer: config.protocol.fn_layer,
            fn_bindings: config.protocol.fn_bindings,
            layout,
        }
    }

    pub fn latched_modifiers(&self) -> HidModifiers {
        self.latched
    }

    pub fn fn_layer_active(&self) -> bool {
        self.fn_active
    }

    /// Map `byte` to keyboard commands, updating the latched modifiers and the layer state.
    pub fn dispatch(&mut self, byte: u8) -> Dispatch {
        let mut dispatch = Dispatch::default();
        match ProtocolByte::from(byte) {
            ProtocolByte::LayerOn if self.fn_layer => {
                info!("Fn layer on");
                self.fn_active = true;
            }
            ProtocolByte::LayerOff if self.fn_layer => {
                info!("Fn layer off");
                self.fn_active = false;
            }
            ProtocolByte::EmergencyClear => {
                info!("Emergency clear");
                dispatch.push(HidCommand::ReleaseAll);
                self.latched = HidModifiers::new();
                self.fn_active = false;
                dispatch.reset_requested = true;
            }
            ProtocolByte::ModifierPress(key) => {
                let bit = key.to_hid_modifiers();
                let press = match self.modifier_mode {
                    ModifierMode::PressRelease => true,
                    ModifierMode::Toggle => !self.latched.contains(bit),
                };
                if press {
                    info!("Modifier {:?} latched", key);
                    dispatch.push(HidCommand::Press(key));
                    self.latched |= bit;
                } else {
                    info!("Modifier {:?} released", key);
                    dispatch.push(HidCommand::Release(key));
                    self.latched &= !bit;
                }
            }
            ProtocolByte::ModifierRelease(key) if self.modifier_mode == ModifierMode::PressRelease => {
                info!("Modifier {:?} released", key);
                dispatch.push(HidCommand::Release(key));
                self.latched &= !key.to_hid_modifiers();
            }
            ProtocolByte::Navigation(key) => dispatch.tap(key),
            ProtocolByte::FunctionKey(index) => match (self.fn_active, self.fn_bindings.get(index)) {
                (true, Some(binding)) => {
                    let binding = *binding;
                    debug!("Fn layer binding of F{}: {:?}", index + 1, binding);
                    self.wrap(&mut dispatch, binding.modifiers, binding.key);
                }
                _ => {
                    if let Some(key) = HidKeyCode::function_key(index) {
                        dispatch.tap(key);
                    }
                }
            },
            ProtocolByte::CapsLock => dispatch.tap(HidKeyCode::CapsLock),
            ProtocolByte::CtrlLetter(key) => {
                info!("Ctrl + {:?}", key);
                self.wrap(&mut dispatch, LCTRL, key);
            }
            ProtocolByte::Printable(ch) => match resolve_char(ch).or_else(|| self.layout.resolve(ch)) {
                Some((key, shifted)) => {
                    let modifiers = if shifted { LSHIFT } else { HidModifiers::new() };
                    self.wrap(&mut dispatch, modifiers, key);
                }
                None => warn!("No key for char 0x{:02X}", ch),
            },
            _ => warn!("Unknown protocol byte: 0x{:02X}", byte),
        }
        dispatch
    }

    /// Tap `key` with `modifiers` held. Modifiers which are already latched are neither pressed nor released.
    fn wrap(&self, dispatch: &mut Dispatch, modifiers: HidModifiers, key: HidKeyCode) {
        let modifiers = modifiers & !self.latched;
        for m in modifiers.keys() {
            dispatch.push(HidCommand::Press(m));
        }
        dispatch.tap(key);
        for m in modifiers.keys().rev() {
            dispatch.push(HidCommand::Release(m));
        }
    }
}
