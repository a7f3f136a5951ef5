use crate::{
    add_native_word,
    runtime::{
        built_ins::NativeWordTable,
        data_structures::value::{ToValue, Value},
        error::{self, script_error, script_error_str},
        interpreter::{InterpreterStack, Machine},
    },
};
use std::cmp::Ordering;

/// Helper function to handle math operations.  Handlers for int or floating point operations are
/// passed in as arguments.  The stack operations and value conversions are handled here.  The
/// integer handler returns None when the result can not be represented.
fn math_op(
    machine: &mut Machine,
    fop: fn(f64, f64) -> f64,
    iop: fn(i64, i64) -> Option<i64>,
) -> error::Result<()> {
    let b = machine.pop()?;
    let a = machine.pop()?;

    let result = match (&a, &b) {
        (Value::Int(a), Value::Int(b)) => match iop(*a, *b) {
            Some(result) => result.to_value(),
            None => return script_error_str(machine, "integer overflow"),
        },

        _ if Value::both_are_numeric(&a, &b) => fop(a.get_float_val(), b.get_float_val()).to_value(),

        _ => {
            return script_error(
                machine,
                format!("can not do math with {} and {}", a.type_name(), b.type_name()),
            );
        }
    };

    machine.push(result);
    Ok(())
}

/// Pop a divisor, failing if it is zero.
fn pop_divisor(machine: &mut Machine) -> error::Result<Value> {
    let b = machine.pop()?;

    if b.is_numeric() && b.get_float_val() == 0.0 {
        return script_error_str(machine, "division by zero");
    }

    Ok(b)
}

/// Integer division rounding towards negative infinity.
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let quotient = a.checked_div(b)?;

    if a % b != 0 && ((a < 0) != (b < 0)) {
        Some(quotient - 1)
    } else {
        Some(quotient)
    }
}

/// Remainder of a division rounding towards negative infinity, so it has the sign of the divisor.
fn floor_rem(a: i64, b: i64) -> Option<i64> {
    let remainder = a.checked_rem(b)?;

    if remainder != 0 && ((remainder < 0) != (b < 0)) {
        Some(remainder + b)
    } else {
        Some(remainder)
    }
}

/// Helper function to handle logic operations on the truth of the values.
fn logic_op(machine: &mut Machine, bop: fn(bool, bool) -> bool) -> error::Result<()> {
    let b = machine.pop_as_bool()?;
    let a = machine.pop_as_bool()?;

    machine.push(bop(a, b).to_value());
    Ok(())
}

/// Helper function to handle bit logic operations.  The actual bit operation is passed in as an
/// argument.  The stack operations and value conversions are handled here.
fn logic_bit_op(machine: &mut Machine, bop: fn(i64, i64) -> Option<i64>) -> error::Result<()> {
    let b = machine.pop_as_int()?;
    let a = machine.pop_as_int()?;

    match bop(a, b) {
        Some(result) => {
            machine.push(result.to_value());
            Ok(())
        }

        None => script_error(machine, format!("bit operation out of range for {} and {}", a, b)),
    }
}

/// Helper for the comparison words.  Only numbers with numbers, strings with strings and booleans
/// with booleans can be ordered.
fn compare_op(machine: &mut Machine, test: fn(Ordering) -> bool) -> error::Result<()> {
    let b = machine.pop()?;
    let a = machine.pop()?;

    match a.partial_cmp(&b) {
        Some(ordering) => {
            machine.push(test(ordering).to_value());
            Ok(())
        }

        None => script_error(
            machine,
            format!("can not compare {} {} with {} {}", a.type_name(), a, b.type_name(), b),
        ),
    }
}

/// Add 2 numbers, or join 2 values together if either is a string.
///
/// Signature: `a b -- result`
fn word_add(machine: &mut Machine) -> error::Result<()> {
    let b = machine.peek(0)?;
    let a = machine.peek(1)?;

    if matches!(a, Value::String(_)) || matches!(b, Value::String(_)) {
        let _ = machine.pop()?;
        let _ = machine.pop()?;

        machine.push(format!("{}{}", a, b).to_value());
        return Ok(());
    }

    math_op(machine, |a, b| a + b, |a, b| a.checked_add(b))
}

/// Subtract 2 numbers.
///
/// Signature: `a b -- result`
fn word_subtract(machine: &mut Machine) -> error::Result<()> {
    math_op(machine, |a, b| a - b, |a, b| a.checked_sub(b))
}

/// Multiply 2 numbers.
///
/// Signature: `a b -- result`
fn word_multiply(machine: &mut Machine) -> error::Result<()> {
    math_op(machine, |a, b| a * b, |a, b| a.checked_mul(b))
}

/// Divide 2 numbers.  Integer division rounds towards negative infinity.
///
/// Signature: `a b -- result`
fn word_divide(machine: &mut Machine) -> error::Result<()> {
    let b = pop_divisor(machine)?;

    machine.push(b);
    math_op(machine, |a, b| a / b, floor_div)
}

/// Divide 2 integers giving both the remainder and the quotient.  The remainder takes the sign of
/// the divisor.
///
/// Signature: `a b -- remainder quotient`
fn word_divide_mod(machine: &mut Machine) -> error::Result<()> {
    let b = machine.pop_as_int()?;
    let a = machine.pop_as_int()?;

    if b == 0 {
        return script_error_str(machine, "division by zero");
    }

    let (Some(quotient), Some(remainder)) = (floor_div(a, b), floor_rem(a, b)) else {
        return script_error_str(machine, "integer overflow");
    };

    machine.push(remainder.to_value());
    machine.push(quotient.to_value());

    Ok(())
}

/// Logically and 2 values.
///
/// Signature: `a b -- bool`
fn word_logic_and(machine: &mut Machine) -> error::Result<()> {
    logic_op(machine, |a, b| a && b)
}

/// Logically or 2 values.
///
/// Signature: `a b -- bool`
fn word_logic_or(machine: &mut Machine) -> error::Result<()> {
    logic_op(machine, |a, b| a || b)
}

/// Logically invert a value.
///
/// Signature: `a -- bool`
fn word_logic_not(machine: &mut Machine) -> error::Result<()> {
    let a = machine.pop_as_bool()?;

    machine.push((!a).to_value());
    Ok(())
}

/// Bitwise AND two numbers together.
///
/// Signature: `a b -- result`
fn word_bit_and(machine: &mut Machine) -> error::Result<()> {
    logic_bit_op(machine, |a, b| Some(a & b))
}

/// Bitwise OR two numbers together.
///
/// Signature: `a b -- result`
fn word_bit_or(machine: &mut Machine) -> error::Result<()> {
    logic_bit_op(machine, |a, b| Some(a | b))
}

/// Bitwise XOR two numbers together.
///
/// Signature: `a b -- result`
fn word_bit_xor(machine: &mut Machine) -> error::Result<()> {
    logic_bit_op(machine, |a, b| Some(a ^ b))
}

/// Bitwise NOT a number.
///
/// Signature: `a -- !a`
fn word_bit_not(machine: &mut Machine) -> error::Result<()> {
    let a = machine.pop_as_int()?;

    machine.push((!a).to_value());
    Ok(())
}

/// Shift a number of bits to the left.
///
/// Signature: `a count -- result`
fn word_bit_left_shift(machine: &mut Machine) -> error::Result<()> {
    logic_bit_op(machine, |value, amount| {
        value.checked_shl(u32::try_from(amount).ok()?)
    })
}

/// Shift a number of bits to the right.  The sign is kept.
///
/// Signature: `a count -- result`
fn word_bit_right_shift(machine: &mut Machine) -> error::Result<()> {
    logic_bit_op(machine, |value, amount| {
        value.checked_shr(u32::try_from(amount).ok()?)
    })
}

/// Are 2 values equal?  Any two values can be tested.
///
/// Signature: `a b -- bool`
fn word_equal(machine: &mut Machine) -> error::Result<()> {
    let b = machine.pop()?;
    let a = machine.pop()?;

    machine.push((a == b).to_value());
    Ok(())
}

/// Are 2 values different?
///
/// Signature: `a b -- bool`
fn word_not_equal(machine: &mut Machine) -> error::Result<()> {
    let b = machine.pop()?;
    let a = machine.pop()?;

    machine.push((a != b).to_value());
    Ok(())
}

/// Is one value less than another?
///
/// Signature: `a b -- bool`
fn word_less(machine: &mut Machine) -> error::Result<()> {
    compare_op(machine, Ordering::is_lt)
}

/// Is one value lesser or equal to another?
///
/// Signature: `a b -- bool`
fn word_less_equal(machine: &mut Machine) -> error::Result<()> {
    compare_op(machine, Ordering::is_le)
}

/// Is one value greater than another?
///
/// Signature: `a b -- bool`
fn word_greater(machine: &mut Machine) -> error::Result<()> {
    compare_op(machine, Ordering::is_gt)
}

/// Is one value greater or equal to another?
///
/// Signature: `a b -- bool`
fn word_greater_equal(machine: &mut Machine) -> error::Result<()> {
    compare_op(machine, Ordering::is_ge)
}

/// Register all of the math, logic, bit, and equality words.
pub fn register_math_logic_and_bit_words(table: &mut NativeWordTable) {
    // Math ops.
    add_native_word!(
        table,
        "+",
        word_add,
        "Add 2 numbers or join strings together.",
        "a b -- result"
    );

    add_native_word!(
        table,
        "-",
        word_subtract,
        "Subtract 2 numbers.",
        "a b -- result"
    );

    add_native_word!(
        table,
        "*",
        word_multiply,
        "Multiply 2 numbers.",
        "a b -- result"
    );

    add_native_word!(
        table,
        "/",
        word_divide,
        "Divide 2 numbers, integers round down.",
        "a b -- result"
    );

    add_native_word!(
        table,
        "/mod",
        word_divide_mod,
        "Divide 2 integers giving remainder and quotient.",
        "a b -- remainder quotient"
    );

    // Logical words.
    add_native_word!(
        table,
        "and",
        word_logic_and,
        "Logically and 2 values.",
        "a b -- bool"
    );

    add_native_word!(
        table,
        "or",
        word_logic_or,
        "Logically or 2 values.",
        "a b -- bool"
    );

    add_native_word!(
        table,
        "not",
        word_logic_not,
        "Logically invert a value.",
        "value -- bool"
    );

    // Bitwise operator words.
    add_native_word!(
        table,
        "&",
        word_bit_and,
        "Bitwise AND two numbers together.",
        "a b -- result"
    );

    add_native_word!(
        table,
        "|",
        word_bit_or,
        "Bitwise OR two numbers together.",
        "a b -- result"
    );

    add_native_word!(
        table,
        "^",
        word_bit_xor,
        "Bitwise XOR two numbers together.",
        "a b -- result"
    );

    add_native_word!(
        table,
        "~",
        word_bit_not,
        "Bitwise NOT a number.",
        "number -- result"
    );

    add_native_word!(
        table,
        "<<",
        word_bit_left_shift,
        "Shift a number's bits to the left.",
        "value amount -- result"
    );

    add_native_word!(
        table,
        ">>",
        word_bit_right_shift,
        "Shift a number's bits to the right.",
        "value amount -- result"
    );

    // Equality and comparison words.
    add_native_word!(
        table,
        "=",
        word_equal,
        "Are 2 values equal?",
        "a b -- bool"
    );

    add_native_word!(
        table,
        "<>",
        word_not_equal,
        "Are 2 values different?",
        "a b -- bool"
    );

    add_native_word!(
        table,
        "<",
        word_less,
        "Is a less than b?",
        "a b -- bool"
    );

    add_native_word!(
        table,
        "<=",
        word_less_equal,
        "Is a less than or equal to b?",
        "a b -- bool"
    );

    add_native_word!(
        table,
        ">",
        word_greater,
        "Is a greater than b?",
        "a b -- bool"
    );

    add_native_word!(
        table,
        ">=",
        word_greater_equal,
        "Is a greater than or equal to b?",
        "a b -- bool"
    );
}
