use crate::{
    add_native_word,
    runtime::{
        built_ins::NativeWordTable,
        data_structures::{stack::Frame, value::ToValue},
        error::{self, script_error},
        interpreter::{InterpreterStack, Machine, ThreadManagement},
    },
};

/// Duplicate the top value on the data stack.
///
/// Signature: `value -- value value`
fn word_dup(machine: &mut Machine) -> error::Result<()> {
    let value = machine.peek(0)?;

    machine.push(value);
    Ok(())
}

/// Drop the top value on the data stack.
///
/// Signature: `value -- `
fn word_drop(machine: &mut Machine) -> error::Result<()> {
    let _ = machine.pop()?;

    Ok(())
}

/// Swap the top 2 values on the data stack.
///
/// Signature: `a b -- b a`
fn word_swap(machine: &mut Machine) -> error::Result<()> {
    let b = machine.pop()?;
    let a = machine.pop()?;

    machine.push(b);
    machine.push(a);

    Ok(())
}

/// Make a copy of the second value and place the copy on top.
///
/// Signature: `a b -- a b a`
fn word_over(machine: &mut Machine) -> error::Result<()> {
    let a = machine.peek(1)?;

    machine.push(a);
    Ok(())
}

/// Rotate the third value up to the top of the stack.
///
/// Signature: `a b c -- b c a`
fn word_rot(machine: &mut Machine) -> error::Result<()> {
    let c = machine.pop()?;
    let b = machine.pop()?;
    let a = machine.pop()?;

    machine.push(b);
    machine.push(c);
    machine.push(a);

    Ok(())
}

/// Rotate the top value down to the third place.
///
/// Signature: `a b c -- c a b`
fn word_reverse_rot(machine: &mut Machine) -> error::Result<()> {
    let c = machine.pop()?;
    let b = machine.pop()?;
    let a = machine.pop()?;

    machine.push(c);
    machine.push(a);
    machine.push(b);

    Ok(())
}

/// Get the depth of the data stack before calling this word.
///
/// Signature: ` -- depth`
fn word_stack_depth(machine: &mut Machine) -> error::Result<()> {
    machine.push(machine.stack().len().to_value());
    Ok(())
}

/// Get the current maximum depth of the data stack.
///
/// Signature: ` -- max-depth`
fn word_stack_max_depth(machine: &mut Machine) -> error::Result<()> {
    machine.push(machine.stack_max_depth().to_value());
    Ok(())
}

/// Copy the value at the given depth to the top of the stack.  `0 pick` is `dup`.
///
/// Signature: `index -- picked-value`
fn word_pick(machine: &mut Machine) -> error::Result<()> {
    let index = machine.pop_as_usize()?;
    let count = machine.stack().len();

    if index >= count {
        return script_error(
            machine,
            format!("index {} out of range of stack size {}", index, count),
        );
    }

    let value = machine.peek(index)?;
    machine.push(value);

    Ok(())
}

/// Move the top of the data stack onto the return stack.
///
/// Signature: `value -- `
fn word_to_return(machine: &mut Machine) -> error::Result<()> {
    let value = machine.pop()?;

    machine.push_frame(Frame::Value(value));
    Ok(())
}

/// Move a value parked by `>r` back onto the data stack.
///
/// Signature: ` -- value`
fn word_from_return(machine: &mut Machine) -> error::Result<()> {
    match machine.pop_frame()? {
        Frame::Value(value) => {
            machine.push(value);
            Ok(())
        }

        Frame::Call(pc) => {
            // Leave the return address where it was so the thread can still return.
            machine.push_frame(Frame::Call(pc.clone()));
            Err(error::MachineError::UnknownCell(format!("return address {}", pc)))
        }
    }
}

/// Drop a value parked by `>r`.
///
/// Signature: ` -- `
fn word_return_drop(machine: &mut Machine) -> error::Result<()> {
    word_from_return(machine)?;
    word_drop(machine)
}

pub fn register_stack_words(table: &mut NativeWordTable) {
    add_native_word!(
        table,
        "dup",
        word_dup,
        "Duplicate the top value on the data stack.",
        "value -- value value"
    );

    add_native_word!(
        table,
        "drop",
        word_drop,
        "Discard the top value on the data stack.",
        "value -- "
    );

    add_native_word!(
        table,
        "swap",
        word_swap,
        "Swap the top 2 values on the data stack.",
        "a b -- b a"
    );

    add_native_word!(
        table,
        "over",
        word_over,
        "Make a copy of the second value and place it on top.",
        "a b -- a b a"
    );

    add_native_word!(
        table,
        "rot",
        word_rot,
        "Rotate the third value to the top of the stack.",
        "a b c -- b c a"
    );

    add_native_word!(
        table,
        "-rot",
        word_reverse_rot,
        "Rotate the top value down to the third place.",
        "a b c -- c a b"
    );

    add_native_word!(
        table,
        "depth",
        word_stack_depth,
        "Get the depth of the data stack.",
        " -- depth"
    );

    add_native_word!(
        table,
        "max-depth",
        word_stack_max_depth,
        "Get the maximum depth the data stack has reached.",
        " -- max-depth"
    );

    add_native_word!(
        table,
        "pick",
        word_pick,
        "Copy the value at the given depth to the top of the stack.",
        "index -- value"
    );

    add_native_word!(
        table,
        ">r",
        word_to_return,
        "Move the top value of the data stack to the return stack.",
        "value -- "
    );

    add_native_word!(
        table,
        "r>",
        word_from_return,
        "Move a value from the return stack back to the data stack.",
        " -- value"
    );

    add_native_word!(
        table,
        "rdrop",
        word_return_drop,
        "Discard a value from the return stack.",
        " -- "
    );
}
