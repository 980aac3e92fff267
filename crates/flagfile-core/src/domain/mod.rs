//! Domain types: flag values and the registry that holds them.
//!
//! Nothing in this module touches the file system or the process arguments.
//! The loader and the argument parser are layered on top and only reach the
//! registry through [`registry::SettingRegistry::set`].

/// Text form of duration values.
pub mod duration;

/// Declared flags and type-checked assignment.
pub mod registry;

/// The closed set of value kinds and their parsers.
pub mod value;
