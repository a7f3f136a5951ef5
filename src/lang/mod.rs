/// Module for managing the original source code and where in it we currently are.
pub mod source_buffer;

/// Module for turning a stream of characters into a stream of whitespace delimited tokens.
pub mod tokenizing;

/// Module for turning a token's text into a typed runtime value.
pub mod translation;

/// Module for turning compiled threads back into readable, recompilable source.
pub mod code;
