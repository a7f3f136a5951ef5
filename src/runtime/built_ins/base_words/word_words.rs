use crate::{
    add_native_word,
    lang::translation::translate,
    runtime::{
        built_ins::NativeWordTable,
        data_structures::value::ToValue,
        error::{self, script_error},
        interpreter::{CodeManagement, InterpreterStack, Machine, WordManagement},
    },
};

/// Check if the referenced word is immediate.
///
/// Signature: `word -- bool`
fn word_is_immediate(machine: &mut Machine) -> error::Result<()> {
    let word = machine.pop_as_word()?;

    machine.push(word.is_immediate().to_value());
    Ok(())
}

/// Translate a name the way the outer interpreter does, and report if the result was a word.
///
/// Signature: `name -- value is-word`
fn word_word_from_name(machine: &mut Machine) -> error::Result<()> {
    let name = machine.pop_as_string()?;
    let value = translate(machine.dictionary(), &name);
    let is_word = value.is_word();

    machine.push(value);
    machine.push(is_word.to_value());

    Ok(())
}

/// Is the machine interpreting?  False while compiling.
///
/// Signature: ` -- bool`
fn word_forth_interpret(machine: &mut Machine) -> error::Result<()> {
    machine.push(machine.is_interpreting().to_value());
    Ok(())
}

/// Store a value in a named variable.
///
/// Signature: `value name -- `
fn word_variable_write(machine: &mut Machine) -> error::Result<()> {
    let name = machine.pop_as_string()?;
    let value = machine.pop()?;

    machine.set_variable(name, value);
    Ok(())
}

/// Read the value of a named variable.
///
/// Signature: `name -- value`
fn word_variable_read(machine: &mut Machine) -> error::Result<()> {
    let name = machine.pop_as_string()?;

    match machine.variable(&name) {
        Some(value) => {
            let value = value.clone();

            machine.push(value);
            Ok(())
        }

        None => script_error(machine, format!("variable {} has not been set", name)),
    }
}

pub fn register_word_words(table: &mut NativeWordTable) {
    add_native_word!(
        table,
        "is_immediate",
        word_is_immediate,
        "Check if a word is immediate.",
        "word -- bool"
    );

    add_native_word!(
        table,
        "word_from_name",
        word_word_from_name,
        "Translate a name, reporting if it named a word.",
        "name -- value is-word"
    );

    add_native_word!(
        table,
        "forth_interpret",
        word_forth_interpret,
        "Is the machine interpreting rather than compiling?",
        " -- bool"
    );

    add_native_word!(
        table,
        "!",
        word_variable_write,
        "Store a value in a named variable.",
        "value name -- "
    );

    add_native_word!(
        table,
        "@",
        word_variable_read,
        "Read the value of a named variable.",
        "name -- value"
    );
}
