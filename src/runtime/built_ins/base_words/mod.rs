/// Words that manipulate the data stack.
mod stack_words;

/// Words that work with math, logic, bit manipulation and Value equality.
mod math_logic_and_bit_words;

/// Words that create new words and switch between interpreting and compiling.
mod word_creation_words;

/// Words that read operands from the running thread and move through it.
mod thread_words;

/// Words that work with words, the dictionary, and variables.
mod word_words;

use crate::runtime::built_ins::{
    base_words::{
        math_logic_and_bit_words::register_math_logic_and_bit_words,
        stack_words::register_stack_words, thread_words::register_thread_words,
        word_creation_words::register_word_creation_words, word_words::register_word_words,
    },
    NativeWordTable,
};

/// Called to register all of the core words of the language.
pub fn register_base_words(table: &mut NativeWordTable) {
    register_stack_words(table);
    register_math_logic_and_bit_words(table);
    register_word_creation_words(table);
    register_thread_words(table);
    register_word_words(table);
}
