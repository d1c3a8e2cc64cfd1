//! Snap command-line construction
//!
//! Pure functions building the argument vector handed to the elevation
//! helper. snap is positional-sensitive, so the order is fixed: verb,
//! channel, confinement flag, package name.

use crate::types::{Confinement, PackageDescriptor};

/// Package manager binary, first element of the elevated argument vector
pub const SNAP_PROGRAM: &str = "snap";

/// OS privilege-elevation front end the command runs through
pub const ELEVATION_HELPER: &str = "pkexec";

/// Arguments for installing the described package
///
/// The channel token is passed through verbatim after a double dash; no
/// validation is performed here.
#[must_use]
pub fn install_args(descriptor: &PackageDescriptor) -> Vec<String> {
    let mut args = vec![SNAP_PROGRAM.to_string(), "install".to_string()];
    args.push(format!("--{}", descriptor.channel));
    match descriptor.confinement {
        Confinement::Devmode => args.push("--devmode".to_string()),
        Confinement::Classic => args.push("--classic".to_string()),
        Confinement::None => {}
    }
    args.push(descriptor.package_name.clone());
    args
}

/// Arguments for removing the described package
///
/// Channel and confinement are irrelevant for removal and ignored.
#[must_use]
pub fn remove_args(descriptor: &PackageDescriptor) -> Vec<String> {
    vec![
        SNAP_PROGRAM.to_string(),
        "remove".to_string(),
        descriptor.package_name.clone(),
    ]
}
