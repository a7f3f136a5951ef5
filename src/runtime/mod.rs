/// The values, words, stacks and dictionary the machine is built from.
pub mod data_structures;

/// The native words every machine starts with.
pub mod built_ins;

/// Error types and reporting.
pub mod error;

/// The machine along with its inner and outer interpreters.
pub mod interpreter;
