use std::{cell::RefCell, rc::Rc};
use tforth::add_native_word;
use tforth::lang::code::{decompile, definition_source};
use tforth::lang::source_buffer::SourceBuffer;
use tforth::runtime::built_ins::io_words::CapturedOutput;
use tforth::runtime::data_structures::{
    stack::StackKind,
    value::{ToValue, Value},
    word::WordRuntime,
};
use tforth::runtime::error::{self, MachineError};
use tforth::runtime::interpreter::{
    CodeManagement, InterpreterStack, Machine, OnError, ThreadManagement, WordManagement,
};

fn new_machine() -> (Machine, CapturedOutput) {
    let output = CapturedOutput::new();
    let machine = Machine::with_output(Box::new(output.clone()));

    (machine, output)
}

fn stack_of(machine: &Machine) -> Vec<Value> {
    machine.stack().items().to_vec()
}

/// Register a word that records its name and the program counter index it saw.
fn add_probe(machine: &mut Machine, name: &'static str, log: &Rc<RefCell<Vec<(String, usize)>>>) {
    let log = log.clone();

    let _ = add_native_word!(
        machine,
        name,
        move |machine: &mut Machine| -> error::Result<()> {
            let index = machine.pc().map(|pc| pc.index()).unwrap_or(usize::MAX);

            log.borrow_mut().push((name.to_string(), index));
            Ok(())
        },
        "Record that the word ran.",
        " -- "
    );
}

#[test]
fn colon_definitions_run() {
    let (mut machine, _) = new_machine();

    machine.process_source("<test>", ": sq dup * ; 3 sq").unwrap();
    assert_eq!(stack_of(&machine), vec![Value::Int(9)]);

    let sq = machine.find_word("sq").unwrap();
    assert!(!sq.is_immediate());
    assert!(!sq.is_primitive());
}

#[test]
fn double_is_not_immediate() {
    let (mut machine, _) = new_machine();

    machine.process_source("<test>", ": double dup + ; 4 double").unwrap();

    assert_eq!(stack_of(&machine), vec![Value::Int(8)]);
    assert!(!machine.find_word("double").unwrap().is_immediate());
}

#[test]
fn data_stack_is_last_in_first_out() {
    let (mut machine, _) = new_machine();

    machine.process_source("<test>", "1 2 3").unwrap();

    assert_eq!(machine.pop().unwrap(), Value::Int(3));
    assert_eq!(machine.pop().unwrap(), Value::Int(2));
    assert_eq!(machine.pop().unwrap(), Value::Int(1));
    assert_eq!(machine.pop(), Err(MachineError::StackUnderflow(StackKind::Data)));
    assert_eq!(machine.stack_max_depth(), 3);
}

#[test]
fn zero_branch_skips_when_false() {
    let (mut machine, _) = new_machine();
    let log = Rc::new(RefCell::new(Vec::new()));

    for name in ["a", "b", "c", "d"] {
        add_probe(&mut machine, name, &log);
    }

    let probe = machine.compile_word("probe", "0branch 3 a b c d", WordRuntime::Normal);

    machine.push(false.to_value());
    machine.execute(&probe).unwrap();

    assert_eq!(*log.borrow(), vec![("d".to_string(), 6)]);
    assert!(machine.stack().is_empty());
    assert!(machine.pc().is_none());
}

#[test]
fn zero_branch_falls_through_when_true() {
    let (mut machine, _) = new_machine();
    let log = Rc::new(RefCell::new(Vec::new()));

    for name in ["a", "b", "c", "d"] {
        add_probe(&mut machine, name, &log);
    }

    let probe = machine.compile_word("probe", "0branch 3 a b c d", WordRuntime::Normal);

    machine.push(Value::Int(7));
    machine.execute(&probe).unwrap();

    let names: Vec<_> = log.borrow().iter().map(|(name, index)| (name.clone(), *index)).collect();

    assert_eq!(
        names,
        vec![
            ("a".to_string(), 3),
            ("b".to_string(), 4),
            ("c".to_string(), 5),
            ("d".to_string(), 6),
        ]
    );
}

#[test]
fn nested_calls_use_the_return_stack() {
    let (mut machine, _) = new_machine();
    let log = Rc::new(RefCell::new(Vec::new()));

    add_probe(&mut machine, "probe", &log);
    machine.process_source("<test>", ": inner probe ; : outer inner probe ; outer").unwrap();

    // Each probe sees the index of the cell after its own.
    assert_eq!(
        *log.borrow(),
        vec![("probe".to_string(), 1), ("probe".to_string(), 2)]
    );
    assert!(machine.return_stack().is_empty());
    assert!(machine.pc().is_none());
}

#[test]
fn redefinition_keeps_compiled_references() {
    let (mut machine, _) = new_machine();

    machine.process_source("<test>", ": f 1 ; : g f ; : f 2 ;").unwrap();

    let first_g = machine.find_word("g").unwrap();
    machine.execute(&first_g).unwrap();
    machine.process_source("<test>", "f").unwrap();

    assert_eq!(stack_of(&machine), vec![Value::Int(1), Value::Int(2)]);
    assert_eq!(machine.dictionary().last().unwrap().name(), "f");
}

#[test]
fn redefining_the_running_word_finishes_the_old_thread() {
    let (mut machine, _) = new_machine();

    machine.process_source("<test>", ": f 1 word create 2 ; f f 3").unwrap();

    assert_eq!(stack_of(&machine), vec![Value::Int(1), Value::Int(2), Value::Int(3)]);

    let f = machine.find_word("f").unwrap();
    assert!(!f.is_primitive());
    assert!(f.is_empty());
}

#[test]
fn redefining_a_caller_on_the_return_stack_finishes_the_old_thread() {
    let (mut machine, _) = new_machine();

    machine
        .process_source("<test>", ": f word create 2 ; : g 1 f 3 ; g g 4")
        .unwrap();

    assert_eq!(
        stack_of(&machine),
        vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)]
    );
    assert!(machine.find_word("g").unwrap().is_empty());
    assert!(machine.return_stack().is_empty());
}

#[test]
fn immediate_words_run_while_compiling() {
    let (mut machine, _) = new_machine();

    machine.process_source("<test>", ": five 5 ; immediate : user five ;").unwrap();

    assert_eq!(stack_of(&machine), vec![Value::Int(5)]);
    assert!(machine.find_word("five").unwrap().is_immediate());

    // Only the exit added by ; was compiled into user.
    assert_eq!(machine.find_word("user").unwrap().len(), 1);
}

#[test]
fn decompiled_source_recompiles_to_the_same_word() {
    let (mut machine, _) = new_machine();

    machine.process_source("<test>", ": fancy 1 2.5 + hello [ 7 ] , drop ;").unwrap();

    let fancy = machine.find_word("fancy").unwrap();
    let source = definition_source(&machine, &fancy);

    assert_eq!(source, ": fancy 1 2.5 + hello [ 7 ] , drop ;");

    let (mut copy, _) = new_machine();
    copy.process_source("<copy>", &source).unwrap();

    let recompiled = copy.find_word("fancy").unwrap();
    assert_eq!(decompile(&copy, &recompiled), decompile(&machine, &fancy));

    machine.execute(&fancy).unwrap();
    copy.execute(&recompiled).unwrap();

    assert_eq!(stack_of(&machine), stack_of(&copy));
    assert_eq!(stack_of(&copy), vec![Value::Float(3.5), Value::from("hello")]);
}

#[test]
fn immediate_references_decompile_through_comma() {
    let (mut machine, _) = new_machine();

    machine
        .process_source(
            "<test>",
            ": loud 99 ; immediate : user [ word loud word_from_name drop ] , ;",
        )
        .unwrap();

    let user = machine.find_word("user").unwrap();

    assert!(machine.stack().is_empty());
    assert_eq!(
        definition_source(&machine, &user),
        ": user [ word loud word_from_name drop ] , ;"
    );

    machine.execute(&user).unwrap();
    assert_eq!(stack_of(&machine), vec![Value::Int(99)]);
}

#[test]
fn literal_immediate_references_decompile_through_comma() {
    let source = ": loud 99 ; immediate : user lit [ word loud word_from_name drop ] , ;";
    let (mut machine, _) = new_machine();

    machine.process_source("<test>", source).unwrap();

    let user = machine.find_word("user").unwrap();
    let text = definition_source(&machine, &user);

    assert_eq!(text, ": user lit [ word loud word_from_name drop ] , ;");

    let (mut copy, _) = new_machine();
    copy.process_source("<copy>", ": loud 99 ; immediate").unwrap();
    copy.process_source("<copy>", &text).unwrap();

    // loud must not have run while the copy was compiled.
    assert!(copy.stack().is_empty());

    let recompiled = copy.find_word("user").unwrap();
    assert_eq!(decompile(&copy, &recompiled), decompile(&machine, &user));

    copy.execute(&recompiled).unwrap();
    assert!(matches!(stack_of(&copy).as_slice(), [Value::Word(word)] if word.name() == "loud"));
}

#[test]
fn see_and_words_write_to_the_output() {
    let (mut machine, output) = new_machine();

    machine.process_source("<test>", ": sq dup * ; immediate see sq see dup").unwrap();

    assert_eq!(
        output.contents(),
        ": sq dup * ; immediate\n\
         dup is a native word.  Duplicate the top value on the data stack.\n"
    );

    output.clear();
    machine.process_source("<test>", "words").unwrap();

    let listing = output.contents();

    assert!(listing.starts_with(&format!("{} words defined.", machine.dictionary().len())));
    assert!(listing.lines().any(|line| line.starts_with("sq ") && line.contains("immediate")));
}

#[test]
fn print_words() {
    let (mut machine, output) = new_machine();

    machine
        .process_source("<test>", "65 emit hi emit 1 . 2.5 . cr 1 2 .s")
        .unwrap();

    assert_eq!(output.contents(), "Ahi1 2.5 \n<2> 1 2\n");
    assert_eq!(stack_of(&machine), vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn key_and_word_read_the_input() {
    let (mut machine, _) = new_machine();

    machine.process_source("<test>", "word next key").unwrap();

    assert_eq!(stack_of(&machine), vec![Value::from("next"), Value::from("")]);
}

#[test]
fn errors_report_the_call_stack() {
    let (mut machine, _) = new_machine();

    let error = machine.process_source("<test>", ": broken 1 0 / ; broken").unwrap_err();

    assert_eq!(
        *error.error(),
        MachineError::NativeOperationFailure {
            word: "/".to_string(),
            message: "division by zero".to_string()
        }
    );

    let call_stack = error.call_stack().clone().unwrap();
    let names: Vec<_> = call_stack.iter().map(|item| item.word().clone()).collect();

    assert_eq!(names, vec!["broken".to_string(), "/".to_string()]);
    assert_eq!(call_stack[0].index(), Some(4));
    assert!(error.to_string().contains("Call stack"));
}

#[test]
fn machine_recovers_after_an_error() {
    let (mut machine, _) = new_machine();

    assert!(machine.process_source("<test>", ": broken 1 0 / ; broken").is_err());

    assert!(machine.is_interpreting());
    assert!(machine.pc().is_none());
    assert!(machine.return_stack().is_empty());

    machine.process_source("<test>", ": half 2 / ; 8 half").unwrap();

    // The 1 pushed before the failed division is still there.
    assert_eq!(stack_of(&machine), vec![Value::Int(1), Value::Int(4)]);
}

#[test]
fn error_while_compiling_returns_to_interpreting() {
    let (mut machine, _) = new_machine();

    assert!(machine.process_source("<test>", ": half drop drop ; 1 half").is_err());
    assert!(machine.process_source("<test>", ": oops :").is_err());

    assert!(machine.is_interpreting());

    machine.process_source("<test>", "3 4 +").unwrap();
    assert_eq!(stack_of(&machine), vec![Value::Int(7)]);
}

#[test]
fn report_and_continue_skips_the_failed_line() {
    let (mut machine, _) = new_machine();

    let _ = machine.set_input(Box::new(SourceBuffer::new(
        "<repl>",
        "1 0 / 100 200\n2 3 +\n",
    )));

    machine.interpret(OnError::ReportAndContinue).unwrap();

    assert_eq!(stack_of(&machine), vec![Value::Int(1), Value::Int(5)]);
}

#[test]
fn threaded_boot_compiles_and_runs() {
    let (mut machine, output) = new_machine();

    let _ = machine.set_input(Box::new(SourceBuffer::new(
        "<boot>",
        ": sq dup * ; 4 sq 1 2 + : greet hello . ; greet",
    )));

    machine.boot(OnError::Stop).unwrap();

    assert_eq!(stack_of(&machine), vec![Value::Int(16), Value::Int(3)]);
    assert_eq!(output.contents(), "hello ");
    assert_eq!(
        definition_source(&machine, &machine.find_word("sq").unwrap()),
        ": sq dup * ;"
    );
}

#[test]
fn threaded_boot_matches_native_interpreter() {
    let code = ": count dup 0branch [ 5 ] , 1 - branch [ -8 ] , ; \
                : five 5 ; immediate : user five 2 ; \
                10 count user x ! x @";

    let (mut native, _) = new_machine();
    native.process_source("<native>", code).unwrap();

    let (mut threaded, _) = new_machine();
    let _ = threaded.set_input(Box::new(SourceBuffer::new("<threaded>", code)));
    threaded.boot(OnError::Stop).unwrap();

    assert_eq!(stack_of(&native), stack_of(&threaded));
    assert_eq!(
        decompile(&native, &native.find_word("count").unwrap()),
        decompile(&threaded, &threaded.find_word("count").unwrap())
    );
}

#[test]
fn threaded_boot_recovers_and_continues() {
    let (mut machine, _) = new_machine();

    let _ = machine.set_input(Box::new(SourceBuffer::new("<boot>", "drop 1 2 +\n3 4 +\n")));

    machine.boot(OnError::ReportAndContinue).unwrap();

    assert_eq!(stack_of(&machine), vec![Value::Int(7)]);
}

#[test]
fn bye_stops_reading_input() {
    let (mut machine, _) = new_machine();

    machine.process_source("<test>", "1 : quit bye 99 ; quit 2").unwrap();

    assert!(machine.is_finished());
    assert_eq!(stack_of(&machine), vec![Value::Int(1)]);
}
