use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::Command;

use tforth::lang::source_buffer::ReaderBuffer;
use tforth::runtime::built_ins::io_words::CapturedOutput;
use tforth::runtime::error::{MachineError, ScriptResult};
use tforth::runtime::interpreter::{CodeManagement, Machine, OnError};
use test_case::test_case;

// Helper to get absolute path from manifest dir
fn manifest_path(rel: &str) -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir).join(rel)
}

fn expected_output(script: &str) -> String {
    let path = manifest_path(&format!("tests/scripts/{}.out", script));
    fs::read_to_string(path).unwrap()
}

/// Run a script fixture through the library, reading the file the way the binary does.  Returns
/// the result along with everything the script printed.
fn run_script(script: &str, threaded: bool) -> (ScriptResult<()>, String) {
    let path = manifest_path(&format!("tests/scripts/{}.f", script));
    let output = CapturedOutput::new();
    let mut machine = Machine::with_output(Box::new(output.clone()));

    let file = File::open(&path).unwrap();
    let input = ReaderBuffer::new(path.to_str().unwrap(), BufReader::new(file));
    let _ = machine.set_input(Box::new(input));

    let result = if threaded {
        machine.boot(OnError::Stop)
    } else {
        machine.interpret(OnError::Stop)
    };

    (result, output.contents())
}

#[test_case("00_words", false; "words native")]
#[test_case("00_words", true; "words threaded")]
#[test_case("01_loops", false; "loops native")]
#[test_case("01_loops", true; "loops threaded")]
fn script_output(script: &str, threaded: bool) {
    let (result, output) = run_script(script, threaded);

    println!("\n--- Output of {}.f ---\n{}\n-------------------------------", script, output);

    assert!(result.is_ok(), "Script failed: {:?}", result.err());
    assert_eq!(output, expected_output(script));
}

#[test_case(false; "native")]
#[test_case(true; "threaded")]
fn failing_script_stops_at_the_error(threaded: bool) {
    let (result, output) = run_script("02_error", threaded);
    let error = result.unwrap_err();

    assert_eq!(output, expected_output("02_error"));
    assert_eq!(
        *error.error(),
        MachineError::NativeOperationFailure {
            word: "/".to_string(),
            message: "division by zero".to_string()
        }
    );

    let location = error.location().clone().unwrap();
    assert!(location.path().ends_with("02_error.f"));
    assert_eq!(location.line(), 5);
}

#[test]
fn binary_runs_a_script() {
    let output = Command::new(env!("CARGO_BIN_EXE_tforth"))
        .arg(manifest_path("tests/scripts/01_loops.f"))
        .output()
        .expect("Failed to run interpreter");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), expected_output("01_loops"));
}

#[test]
fn binary_reports_script_errors() {
    let output = Command::new(env!("CARGO_BIN_EXE_tforth"))
        .arg("--threaded")
        .arg(manifest_path("tests/scripts/02_error.f"))
        .output()
        .expect("Failed to run interpreter");

    assert!(!output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), expected_output("02_error"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("division by zero"));
}

#[test]
fn binary_passes_script_arguments() {
    let script = std::env::temp_dir().join(format!("tforth-args-{}.f", std::process::id()));
    fs::write(&script, "args . . . cr").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_tforth"))
        .arg(&script)
        .arg("first")
        .arg("second")
        .output()
        .expect("Failed to run interpreter");

    let _ = fs::remove_file(&script);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "2 second first \n");
}
