use crate::{
    add_native_word,
    lang::code::definition_source,
    runtime::{
        built_ins::NativeWordTable,
        data_structures::value::{ToValue, Value},
        error::{self, script_error},
        interpreter::{CodeManagement, InterpreterStack, Machine, WordManagement},
    },
};
use std::{
    cell::RefCell,
    io::{self, Write},
    rc::Rc,
};

/// An output sink that keeps everything written to it in memory.  Clones share the same buffer, so
/// one clone can be handed to a machine and the other read from afterwards.
#[derive(Clone, Default)]
pub struct CapturedOutput {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl CapturedOutput {
    pub fn new() -> CapturedOutput {
        CapturedOutput::default()
    }

    /// Everything written so far, as text.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.borrow()).into_owned()
    }

    /// Forget everything written so far.
    pub fn clear(&self) {
        self.buffer.borrow_mut().clear();
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buffer.borrow_mut().extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Read the next token from the input as a string.  The string is empty at the end of the input.
///
/// Signature: ` -- text`
fn word_word(machine: &mut Machine) -> error::Result<()> {
    let text = machine.next_token().map(|token| token.into_text()).unwrap_or_default();

    machine.push(text.to_value());
    Ok(())
}

/// Read the next character from the input as a string.  The string is empty at the end of the
/// input.
///
/// Signature: ` -- character`
fn word_key(machine: &mut Machine) -> error::Result<()> {
    let text = machine.next_char().map(String::from).unwrap_or_default();

    machine.push(text.to_value());
    Ok(())
}

/// Write a character.  Integers are taken as a character code, strings are written as is.
///
/// Signature: `character -- `
fn word_emit(machine: &mut Machine) -> error::Result<()> {
    let text = match machine.pop()? {
        Value::Int(code) => match u32::try_from(code).ok().and_then(char::from_u32) {
            Some(character) => character.to_string(),
            None => return script_error(machine, format!("{} is not a character code", code)),
        },

        Value::String(text) => text,

        other => {
            return script_error(machine, format!("can not emit {} {}", other.type_name(), other));
        }
    };

    machine.write_output(&text)
}

/// Write the top value of the stack followed by a space.
///
/// Signature: `value -- `
fn word_print(machine: &mut Machine) -> error::Result<()> {
    let value = machine.pop()?;

    machine.write_output(&format!("{} ", value))
}

/// Write out the data stack without changing it, bottom first.
///
/// Signature: ` -- `
fn word_print_stack(machine: &mut Machine) -> error::Result<()> {
    let mut text = format!("<{}>", machine.stack().len());

    for value in machine.stack().items() {
        text.push(' ');
        text.push_str(&value.to_string());
    }

    text.push('\n');
    machine.write_output(&text)
}

/// Write a new line.
///
/// Signature: ` -- `
fn word_cr(machine: &mut Machine) -> error::Result<()> {
    machine.write_output("\n")
}

/// Write out the current word dictionary.
///
/// Signature: ` -- `
fn word_print_dictionary(machine: &mut Machine) -> error::Result<()> {
    let listing = machine.dictionary().to_string();

    machine.write_output(&listing)
}

/// Write out the source of the word named by the next token.
///
/// Signature: ` -- `
fn word_see(machine: &mut Machine) -> error::Result<()> {
    let name = machine.next_token_text()?;

    let Some(word) = machine.find_word(&name) else {
        return script_error(machine, format!("word {} is not defined", name));
    };

    let source = definition_source(machine, &word);
    machine.write_output(&format!("{}\n", source))
}

/// Register all of the I/O words.
pub fn register_io_words(table: &mut NativeWordTable) {
    add_native_word!(
        table,
        "word",
        word_word,
        "Read the next token from the input.",
        " -- text"
    );

    add_native_word!(
        table,
        "key",
        word_key,
        "Read the next character from the input.",
        " -- character"
    );

    add_native_word!(
        table,
        "emit",
        word_emit,
        "Write a character code or a string.",
        "character -- "
    );

    add_native_word!(
        table,
        ".",
        word_print,
        "Write the top value of the stack.",
        "value -- "
    );

    add_native_word!(
        table,
        ".s",
        word_print_stack,
        "Write out the data stack without changing it.",
        " -- "
    );

    add_native_word!(
        table,
        "cr",
        word_cr,
        "Write a new line.",
        " -- "
    );

    add_native_word!(
        table,
        "words",
        word_print_dictionary,
        "Write out the current word dictionary.",
        " -- "
    );

    add_native_word!(
        table,
        "see",
        word_see,
        "Write out the source of the next word.",
        " -- "
    );
}
