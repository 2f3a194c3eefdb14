use std::path::Path;
use std::{env, fs};

use binkey_config::{BinkeyTomlConfig, FnModifierToml, ModifierModeToml};
use const_gen::*;

fn main() {
    // Ensure build.rs is re-run when files change
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=BINKEY_TOML_PATH");

    // Read binkey.toml if it's present
    let user_config = if let Ok(toml_path) = env::var("BINKEY_TOML_PATH") {
        println!("cargo:rerun-if-changed={toml_path}");
        BinkeyTomlConfig::load(&toml_path)
    } else {
        BinkeyTomlConfig::from_toml_str("", "<default>")
    };
    let user_config = match user_config {
        Ok(c) => c,
        Err(e) => panic!("Failed to load BINKEY_TOML_PATH file: {e}"),
    };

    let constants = get_constants_str(&user_config);

    // Write to constants.rs file
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("constants.rs");
    fs::write(&dest_path, constants).expect("Failed to write constants.rs file");
}

fn get_constants_str(config: &BinkeyTomlConfig) -> String {
    let link = &config.link;
    let protocol = &config.protocol;
    let toggle_modifiers = protocol.modifier_mode == ModifierModeToml::Toggle;
    let fn_modifier_bit: u8 = match protocol.fn_modifier {
        FnModifierToml::Ctrl => 1 << 0,
        FnModifierToml::Shift => 1 << 1,
        FnModifierToml::Alt => 1 << 2,
        FnModifierToml::Gui => 1 << 3,
    };

    let constant_strs = vec![
        const_declaration!(pub(crate) PULSE_MS = link.pulse_ms),
        const_declaration!(pub(crate) GAP_MS = link.gap_ms),
        const_declaration!(pub(crate) START_WINDOW_MS = link.start_window_ms),
        const_declaration!(pub(crate) INACTIVITY_TIMEOUT_MS = link.inactivity_timeout_ms),
        const_declaration!(pub(crate) DEBOUNCE_THRESHOLD = link.debounce_time),
        const_declaration!(pub(crate) POLL_INTERVAL_US = link.poll_interval_us),
        const_declaration!(pub(crate) START_SYMBOL = protocol.start_symbol),
        const_declaration!(pub(crate) TOGGLE_MODIFIERS = toggle_modifiers),
        const_declaration!(pub(crate) FN_LAYER = protocol.fn_layer),
        const_declaration!(pub(crate) FN_MODIFIER_BITS = fn_modifier_bit),
        const_declaration!(pub(crate) EDGE_CHANNEL_SIZE = config.constants.edge_channel_size),
        const_declaration!(pub(crate) REPORT_CHANNEL_SIZE = config.constants.report_channel_size),
    ];

    constant_strs
        .into_iter()
        .map(|s| "#[allow(clippy::redundant_static_lifetimes)]\n".to_owned() + s.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
