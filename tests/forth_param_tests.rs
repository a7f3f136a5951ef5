// Parameterized tests of the built-in vocabulary using test-case.  Each case runs a snippet on a
// fresh machine and compares the rendered data stack, bottom first.

use tforth::runtime::built_ins::io_words::CapturedOutput;
use tforth::runtime::data_structures::stack::StackKind;
use tforth::runtime::error::{MachineError, ScriptResult};
use tforth::runtime::interpreter::{CodeManagement, InterpreterStack, Machine};
use test_case::test_case;

fn eval_and_stack(code: &str) -> ScriptResult<String> {
    let mut machine = Machine::with_output(Box::new(CapturedOutput::new()));

    machine.process_source("<test>", code)?;

    let stack = machine
        .stack()
        .items()
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>();

    Ok(stack.join(" "))
}

fn eval_error(code: &str) -> MachineError {
    match eval_and_stack(code) {
        Ok(stack) => panic!("expected {:?} to fail, left stack {:?}", code, stack),
        Err(error) => error.error().clone(),
    }
}

// Literals.
#[test_case("0", "0"; "zero")]
#[test_case("42", "42"; "number")]
#[test_case("-17", "-17"; "negative number")]
#[test_case("2.5", "2.5"; "float")]
#[test_case("1e3", "1000.0"; "float with exponent")]
#[test_case("true FALSE", "true false"; "booleans ignore case")]
#[test_case("hello", "hello"; "unknown token is a string")]
#[test_case("( a comment ) 7", "7"; "comment is skipped")]
// Stack words.
#[test_case("1 dup", "1 1"; "dup")]
#[test_case("1 2 drop", "1"; "drop")]
#[test_case("1 2 swap", "2 1"; "swap")]
#[test_case("1 2 over", "1 2 1"; "over")]
#[test_case("1 2 3 rot", "2 3 1"; "rot")]
#[test_case("1 2 3 -rot", "3 1 2"; "reverse rot")]
#[test_case("1 2 3 rot -rot", "1 2 3"; "rot and reverse rot cancel")]
#[test_case("1 2 depth", "1 2 2"; "depth")]
#[test_case("5 6 7 2 pick", "5 6 7 5"; "pick")]
#[test_case("5 6 0 pick", "5 6 6"; "zero pick is dup")]
#[test_case("1 2 3 drop drop max-depth", "1 3"; "max depth")]
#[test_case("1 >r 2 r>", "2 1"; "return stack round trip")]
#[test_case("1 >r 2 rdrop", "2"; "return stack drop")]
// Math.
#[test_case("2 2 +", "4"; "simple add")]
#[test_case("5 2 -", "3"; "simple sub")]
#[test_case("3 4 *", "12"; "simple mul")]
#[test_case("12 3 /", "4"; "simple div")]
#[test_case("7 2 /", "3"; "div rounds down")]
#[test_case("-7 2 /", "-4"; "negative div rounds down")]
#[test_case("7 -2 /", "-4"; "div by negative rounds down")]
#[test_case("13 5 /mod", "3 2"; "div mod")]
#[test_case("-7 2 /mod", "1 -4"; "negative div mod")]
#[test_case("7 -2 /mod", "-1 -4"; "div mod by negative")]
#[test_case("-9223372036854775808 3 /mod", "1 -3074457345618258603"; "div mod of the smallest integer")]
#[test_case("9223372036854775807 -2 /mod", "-1 -4611686018427387904"; "div mod of the largest integer")]
#[test_case("7.0 2 /", "3.5"; "float div")]
#[test_case("1 2.5 +", "3.5"; "mixed add")]
#[test_case("2.0 3 *", "6.0"; "float result stays float")]
#[test_case("foo bar +", "foobar"; "string join")]
#[test_case("foo 1 +", "foo1"; "string and number join")]
// Logic and bits.
#[test_case("6 3 &", "2"; "bit and")]
#[test_case("6 3 |", "7"; "bit or")]
#[test_case("6 3 ^", "5"; "bit xor")]
#[test_case("0 ~", "-1"; "bit not")]
#[test_case("1 4 <<", "16"; "left shift")]
#[test_case("-16 2 >>", "-4"; "right shift keeps sign")]
#[test_case("1 0 and", "false"; "and")]
#[test_case("1 2 and", "true"; "and of true values")]
#[test_case("0 false or", "false"; "or of false values")]
#[test_case("0 7 or", "true"; "or")]
#[test_case("0 not", "true"; "not zero")]
#[test_case("\"\" not", "false"; "non-empty string is true")]
// Comparisons.
#[test_case("3 4 <", "true"; "less")]
#[test_case("4 3 <", "false"; "less is false")]
#[test_case("3 3 <=", "true"; "less equal")]
#[test_case("4 3 >", "true"; "greater")]
#[test_case("3 4 >=", "false"; "greater equal is false")]
#[test_case("1 2 =", "false"; "equal is false")]
#[test_case("1 1.0 =", "true"; "int equals float")]
#[test_case("apple banana <", "true"; "strings compare")]
#[test_case("1 2 <>", "true"; "not equal")]
#[test_case("1 hello =", "false"; "different types are not equal")]
// Variables.
#[test_case("10 x ! x @", "10"; "variable round trip")]
#[test_case("10 x ! 20 x ! x @", "20"; "variable overwrite")]
// Definitions.
#[test_case(": sq dup * ; 3 sq", "9"; "square")]
#[test_case(": sq dup * ; : quad sq sq ; 2 quad", "16"; "nested definitions")]
#[test_case(": f 1 ; : g f ; : f 2 ; g f", "1 2"; "redefinition keeps old references")]
#[test_case(": five 5 ; immediate : user five ; user", "5"; "immediate word runs while compiling")]
#[test_case(": t 1 >r 2 r> ; t", "2 1"; "return stack inside a definition")]
#[test_case(": sign 0 < 0branch [ 4 ] , neg branch [ 2 ] , pos ; -3 sign 3 sign", "neg pos"; "branches")]
#[test_case(": count dup 0branch [ 5 ] , 1 - branch [ -8 ] , ; 5 count", "0"; "counted loop")]
#[test_case("blank create blank", ""; "created word is empty")]
#[test_case("word dup word_from_name", "dup true"; "word from name finds words")]
#[test_case("word 12 word_from_name", "12 false"; "word from name translates")]
#[test_case("4 word dup word_from_name drop exec", "4 4"; "exec of a word reference")]
fn vocabulary(code: &str, expected: &str) {
    assert_eq!(eval_and_stack(code).unwrap(), expected);
}

#[test_case("drop", MachineError::StackUnderflow(StackKind::Data); "drop on empty stack")]
#[test_case("r>", MachineError::StackUnderflow(StackKind::Return); "return pop on empty stack")]
#[test_case("1 0 /", MachineError::NativeOperationFailure {
    word: "/".to_string(),
    message: "division by zero".to_string()
}; "division by zero")]
#[test_case("1 0 /mod", MachineError::NativeOperationFailure {
    word: "/mod".to_string(),
    message: "division by zero".to_string()
}; "div mod by zero")]
#[test_case("1 false /mod", MachineError::NativeOperationFailure {
    word: "/mod".to_string(),
    message: "division by zero".to_string()
}; "div mod by false")]
#[test_case("-9223372036854775808 -1 /mod", MachineError::NativeOperationFailure {
    word: "/mod".to_string(),
    message: "integer overflow".to_string()
}; "div mod overflow")]
#[test_case(": far branch [ 9223372036854775807 ] , ; far", MachineError::InvalidBranch {
    word: "far".to_string(),
    target: i64::MAX
}; "branch offset past the largest integer")]
#[test_case("nothing @", MachineError::NativeOperationFailure {
    word: "@".to_string(),
    message: "variable nothing has not been set".to_string()
}; "unset variable")]
#[test_case("immediate", MachineError::NothingDefined; "immediate with nothing defined")]
#[test_case("5 exec", MachineError::UnknownCell("5".to_string()); "exec of a value")]
#[test_case("lit", MachineError::NoActiveThread; "lit outside of a thread")]
#[test_case(":", MachineError::EndOfInput; "colon at end of input")]
fn vocabulary_errors(code: &str, expected: MachineError) {
    assert_eq!(eval_error(code), expected);
}

#[test]
fn bad_branch_target() {
    let error = eval_error(": far branch [ 100 ] , ; far");

    assert!(matches!(error, MachineError::InvalidBranch { ref word, target: 102 } if word == "far"),
            "unexpected error {:?}", error);
}

#[test]
fn integer_overflow_is_an_error() {
    let error = eval_error("9223372036854775807 1 +");

    assert!(matches!(error, MachineError::NativeOperationFailure { .. }));
}
