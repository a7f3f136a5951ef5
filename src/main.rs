use clap::Parser;
use std::{
    fs::File,
    io::{BufReader, stdin},
    path::PathBuf,
};
use tforth::{
    add_native_word,
    lang::source_buffer::ReaderBuffer,
    runtime::{
        data_structures::value::ToValue,
        error::{self, MachineError, ScriptError},
        interpreter::{CodeManagement, InterpreterStack, Machine, OnError, WordManagement},
    },
};
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::{filter::Targets, prelude::*};

/// A small threaded-code Forth.  Runs a script if one is given, otherwise starts an interactive
/// session on stdin.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// source file to run.  when missing, read from stdin interactively.
    script: Option<PathBuf>,

    /// arguments made available to the script through the `args` word.
    #[arg(trailing_var_arg = true)]
    script_args: Vec<String>,

    /// source file loaded before the script or the interactive session.
    #[arg(short, long, env = "TFORTH_PRELUDE")]
    prelude: Option<PathBuf>,

    /// drive the input through the threaded `init` word rather than the native outer
    /// interpreter.
    #[arg(long)]
    threaded: bool,

    /// a comma-separated list of `tracing` targets and levels to enable.
    ///
    /// for example, `warn,tforth::runtime::interpreter=trace` steps through every cell the
    /// inner interpreter runs.
    #[arg(
        short,
        long = "trace",
        env = "TFORTH_TRACE",
        default_value_t = Targets::new().with_default(LevelFilter::WARN),
    )]
    trace_filter: Targets,
}

fn main() -> Result<(), ScriptError> {
    let Args {
        script,
        script_args,
        prelude,
        threaded,
        trace_filter,
    } = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(trace_filter)
        .init();

    let mut machine = Machine::new();

    register_args_word(&mut machine, script_args);

    if let Some(prelude) = prelude {
        debug!(path = %prelude.display(), "loading prelude");
        machine.process_source_file(&prelude.to_string_lossy())?;
    }

    let on_error = match script {
        Some(path) => {
            let file = File::open(&path).map_err(|error| {
                MachineError::Io(format!("could not read {}: {}", path.display(), error))
            })?;

            let input = ReaderBuffer::new(&path.to_string_lossy(), BufReader::new(file));
            let _ = machine.set_input(Box::new(input));

            OnError::Stop
        }

        None => {
            let input = ReaderBuffer::new("<repl>", stdin().lock()).with_prompt("> ");
            let _ = machine.set_input(Box::new(input));

            OnError::ReportAndContinue
        }
    };

    if threaded {
        machine.boot(on_error)
    } else {
        machine.interpret(on_error)
    }
}

/// Add the `args` word, pushing each of the script's arguments followed by their count.
fn register_args_word(machine: &mut Machine, script_args: Vec<String>) {
    let _ = add_native_word!(
        machine,
        "args",
        move |machine: &mut Machine| -> error::Result<()> {
            for argument in &script_args {
                machine.push(argument.clone().to_value());
            }

            machine.push(script_args.len().to_value());
            Ok(())
        },
        "Push the script's arguments followed by how many there are.",
        " -- arguments... count"
    );
}
