/// Module for reading source text, splitting it into tokens, and translating those tokens into
/// runtime values.  Also home of the decompiler that turns threads back into source tokens.
pub mod lang;

/// Module for the runtime: the data structures of the virtual machine, the native words, the error
/// reporting, and the inner and outer interpreters themselves.
#[macro_use]
pub mod runtime;
