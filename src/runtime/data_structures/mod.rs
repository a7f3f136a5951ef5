/// Module contains the Value enumeration and it's implementation.  The value is one of the core
/// data structures of the machine.  It is used to represent all data that Forth code can push,
/// store and compile.
pub mod value;

/// Words, their bodies and the cells that make up a composite word's thread.
pub mod word;

/// The dictionary module provides the name to word mapping used by the machine.
pub mod dictionary;

/// The generic stack used for both the data and the return stack.
pub mod stack;

/// The program counter used by the inner interpreter to walk threads.
pub mod program_counter;
