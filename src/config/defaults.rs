//! Default values for configuration.

/// Licenses a file must be dual-licensed under.
pub const DEFAULT_LICENSES: [&str; 2] = ["Apache-2.0", "MIT"];

/// Text the copyright statement must contain.
pub const DEFAULT_COPYRIGHT_SUBSTRING: &str = "Khronos";

/// Config file names searched for, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".dual-license-finder.yaml",
    ".dual-license-finder.yml",
    "dual-license-finder.yaml",
    "dual-license-finder.yml",
];

/// Directory under the user config dir (`~/.config/<name>/`).
pub const CONFIG_DIR_NAME: &str = "dual-license-finder";
