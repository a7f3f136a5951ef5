use crate::{
    add_native_immediate_word, add_native_word,
    lang::code::pretty_print_code,
    runtime::{
        built_ins::NativeWordTable,
        data_structures::word::Cell,
        error,
        interpreter::{CodeManagement, InterpreterStack, Machine, WordManagement},
    },
};
use tracing::debug;

/// Start the creation of a new word.  Pull the name of the word from the next token in the token
/// stream, create it and switch to compiling.
///
/// Signature: ` -- `
fn word_start_word(machine: &mut Machine) -> error::Result<()> {
    let name = machine.next_token_text()?;

    let _ = machine.create_word(&name);
    machine.set_interpreting(false);

    Ok(())
}

/// End the creation of a word by compiling in its `exit` and switching back to interpreting.
///
/// Signature: ` -- `
fn word_end_word(machine: &mut Machine) -> error::Result<()> {
    let exit = machine.builtin("exit")?;

    machine.compile_cell(Cell::Word(exit))?;
    machine.set_interpreting(true);

    if tracing::enabled!(tracing::Level::DEBUG) {
        let word = machine.under_construction()?;
        debug!(name = %word.name(), "defined word\n{}", pretty_print_code(&word));
    }

    Ok(())
}

/// Create a new empty word named by the value on the stack and make it the word under
/// construction.  Unlike `:` the machine keeps interpreting.
///
/// Signature: `name -- `
fn word_create(machine: &mut Machine) -> error::Result<()> {
    let name = machine.pop_as_string()?;

    let _ = machine.create_word(&name);
    Ok(())
}

/// Mark the word under construction as immediate.
///
/// Signature: ` -- `
fn word_immediate(machine: &mut Machine) -> error::Result<()> {
    machine.under_construction()?.mark_immediate();
    Ok(())
}

/// Append the top of the stack to the word under construction as a raw cell.  Word references are
/// compiled as calls, everything else as inline values.
///
/// Signature: `value -- `
fn word_comma(machine: &mut Machine) -> error::Result<()> {
    let value = machine.pop()?;

    machine.compile_cell(Cell::from_value(value))
}

/// Switch to interpreting.
///
/// Signature: ` -- `
fn word_interpret_mode(machine: &mut Machine) -> error::Result<()> {
    machine.set_interpreting(true);
    Ok(())
}

/// Switch to compiling.
///
/// Signature: ` -- `
fn word_compile_mode(machine: &mut Machine) -> error::Result<()> {
    machine.set_interpreting(false);
    Ok(())
}

/// Skip a comment.  Tokens are thrown away up to and including one ending in `)`.
///
/// Signature: ` -- `
fn word_comment(machine: &mut Machine) -> error::Result<()> {
    while let Some(token) = machine.next_token() {
        if token.text().ends_with(')') {
            break;
        }
    }

    Ok(())
}

pub fn register_word_creation_words(table: &mut NativeWordTable) {
    add_native_immediate_word!(
        table,
        ":",
        word_start_word,
        "The start of a new word definition.",
        " -- "
    );

    add_native_immediate_word!(
        table,
        ";",
        word_end_word,
        "The end of a new word definition.",
        " -- "
    );

    add_native_word!(
        table,
        "create",
        word_create,
        "Create a new empty word and start constructing it.",
        "name -- "
    );

    add_native_immediate_word!(
        table,
        "immediate",
        word_immediate,
        "Mark the word under construction as immediate.",
        " -- "
    );

    add_native_immediate_word!(
        table,
        ",",
        word_comma,
        "Append a value to the word under construction.",
        "value -- "
    );

    add_native_immediate_word!(
        table,
        "[",
        word_interpret_mode,
        "Switch to interpreting.",
        " -- "
    );

    add_native_immediate_word!(
        table,
        "]",
        word_compile_mode,
        "Switch to compiling.",
        " -- "
    );

    add_native_immediate_word!(
        table,
        "(",
        word_comment,
        "Skip a comment up to the closing ).",
        " -- "
    );
}
