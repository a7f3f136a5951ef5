use crate::{
    add_native_word,
    runtime::{
        built_ins::NativeWordTable,
        data_structures::{value::Value, word::Cell},
        error::{self, script_error},
        interpreter::{InterpreterStack, Machine, ThreadManagement},
    },
};

/// Read a branch offset operand from the running thread.
fn fetch_offset(machine: &mut Machine) -> error::Result<i64> {
    match machine.fetch_operand()? {
        Cell::Literal(Value::Int(offset)) => Ok(offset),
        other => script_error(machine, format!("branch offset must be an integer, found {}", other)),
    }
}

/// Push the next cell of the running thread and skip over it.
///
/// Signature: ` -- value`
fn word_lit(machine: &mut Machine) -> error::Result<()> {
    let cell = machine.fetch_operand()?;

    machine.push(cell.to_value());
    Ok(())
}

/// Push the next cell of the running thread without running it, even if it is a word.
///
/// Signature: ` -- value`
fn word_tick(machine: &mut Machine) -> error::Result<()> {
    word_lit(machine)
}

/// Jump by the offset in the next cell, counted from the cell after it.
///
/// Signature: ` -- `
fn word_branch(machine: &mut Machine) -> error::Result<()> {
    let offset = fetch_offset(machine)?;

    machine.jump(offset)
}

/// Jump by the offset in the next cell only if the top of the stack is false.  The offset is
/// skipped either way.
///
/// Signature: `condition -- `
fn word_zero_branch(machine: &mut Machine) -> error::Result<()> {
    let condition = machine.pop_as_bool()?;
    let offset = fetch_offset(machine)?;

    if !condition {
        machine.jump(offset)?;
    }

    Ok(())
}

/// Return from the running thread.
///
/// Signature: ` -- `
fn word_exit(machine: &mut Machine) -> error::Result<()> {
    machine.exit_thread()
}

/// Execute the word referenced on top of the stack.
///
/// Signature: `word -- `
fn word_exec(machine: &mut Machine) -> error::Result<()> {
    let word = machine.pop_as_word()?;

    machine.execute(&word)
}

/// Stop the machine.  The running thread ends and no more input is read.
///
/// Signature: ` -- `
fn word_bye(machine: &mut Machine) -> error::Result<()> {
    machine.finish();
    Ok(())
}

pub fn register_thread_words(table: &mut NativeWordTable) {
    add_native_word!(
        table,
        "lit",
        word_lit,
        "Push the next cell of the thread as a value.",
        " -- value"
    );

    add_native_word!(
        table,
        "'",
        word_tick,
        "Push the next cell of the thread without running it.",
        " -- value"
    );

    add_native_word!(
        table,
        "branch",
        word_branch,
        "Jump by the offset in the next cell.",
        " -- "
    );

    add_native_word!(
        table,
        "0branch",
        word_zero_branch,
        "Jump by the offset in the next cell if the condition is false.",
        "condition -- "
    );

    add_native_word!(
        table,
        "exit",
        word_exit,
        "Return from the running thread.",
        " -- "
    );

    add_native_word!(
        table,
        "exec",
        word_exec,
        "Execute a word reference.",
        "word -- "
    );

    add_native_word!(
        table,
        "bye",
        word_bye,
        "Stop the machine.",
        " -- "
    );
}
