use crate::{
    lang::source_buffer::SourceLocation,
    runtime::{
        built_ins::{base_words::register_base_words, io_words::register_io_words},
        data_structures::word::WordRuntime,
        error,
        interpreter::Machine,
    },
};
use lazy_static::lazy_static;

/// The core words of the language.
pub mod base_words;

/// Words that perform I/O operations.
pub mod io_words;

/// The handler of a built-in native word.  Plain function pointers, so the table of built-ins can
/// be shared by every machine.
pub type NativeHandler = fn(&mut Machine) -> error::Result<()>;

/// A built-in native word, as registered in the static table.
pub struct NativeWord {
    pub name: String,
    pub handler: NativeHandler,
    pub location: SourceLocation,
    pub description: String,
    pub signature: String,
    pub runtime: WordRuntime,
}

/// The table of built-in native words, in registration order.
#[derive(Default)]
pub struct NativeWordTable {
    words: Vec<NativeWord>,
}

impl NativeWordTable {
    pub fn new() -> NativeWordTable {
        NativeWordTable { words: Vec::new() }
    }

    /// Add a word to the table.  Called by the `add_native_word!` macros, with the same
    /// parameters the machine takes.
    #[allow(clippy::too_many_arguments)]
    pub fn add_word(
        &mut self,
        file: &str,
        line: u32,
        column: u32,
        name: &str,
        handler: NativeHandler,
        description: &str,
        signature: &str,
        runtime: WordRuntime,
    ) {
        self.words.push(NativeWord {
            name: name.to_string(),
            handler,
            location: SourceLocation::new_from_info(file, line as usize, column as usize),
            description: description.to_string(),
            signature: signature.to_string(),
            runtime,
        });
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NativeWord> {
        self.words.iter()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

lazy_static! {
    /// Every native word a new machine starts with.  Built once, on first use.
    pub static ref BUILT_IN_WORDS: NativeWordTable = {
        let mut table = NativeWordTable::new();

        register_base_words(&mut table);
        register_io_words(&mut table);

        table
    };
}
