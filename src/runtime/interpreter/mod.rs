use crate::{
    lang::{source_buffer::SourceLocation, tokenizing::{Token, TokenSource}},
    runtime::{
        data_structures::{
            dictionary::Dictionary,
            program_counter::Pc,
            stack::{DataStack, Frame, ReturnStack},
            value::Value,
            word::{Cell, WordRef, WordRuntime},
        },
        error,
    },
};
use std::fmt::{self, Display, Formatter};

/// The machine itself, its state and the word registration.
pub mod machine;

/// The inner interpreter, stepping through threads.
pub mod inner;

/// The outer interpreter, turning tokens into execution or compilation.
pub mod outer;

pub use machine::Machine;
pub use outer::OnError;

/// A call stack item is a record of an executing word's name, where it was defined and, for
/// composite words, which cell of it was running.  These items are read-only and the fields are
/// accessed by member functions.
#[derive(Clone, Debug, PartialEq)]
pub struct CallItem {
    location: SourceLocation,
    word: String,
    index: Option<usize>,
}

impl CallItem {
    /// Create a new call stack item.
    pub fn new(word: String, location: SourceLocation, index: Option<usize>) -> CallItem {
        CallItem {
            location,
            word,
            index,
        }
    }

    /// A call item for the cell a program counter has last fetched.
    pub fn from_pc(pc: &Pc) -> CallItem {
        CallItem::new(
            pc.word().name().clone(),
            pc.word().location().clone(),
            Some(pc.index().saturating_sub(1)),
        )
    }

    /// Where in the source code this word was defined.
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    // The name of the word being executed.
    pub fn word(&self) -> &String {
        &self.word
    }

    /// The cell of a composite word that was executing.
    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

/// Make sure that this word can be nicely displayed to the user in event of an error.
impl Display for CallItem {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}: {} +{}", self.location, self.word, index),
            None => write!(f, "{}: {}", self.location, self.word),
        }
    }
}

/// Type to represent a call stack.  The oldest caller comes first.  This is used to help track
/// errors and provide a script's stack trace to the user.
pub type CallStack = Vec<CallItem>;

/// Trait for managing the machine's data stack.  Intended to be called by native words.
pub trait InterpreterStack {
    /// What has the maximum depth the stack as reached so far?
    fn stack_max_depth(&self) -> usize;

    /// Use to examine the full data stack when required.  One example is for the stack dump command
    /// `.s`.
    fn stack(&self) -> &DataStack;

    /// Push a value onto the stack.  This is the primary way of sending values to words.
    fn push(&mut self, value: Value);

    /// Pop a value from the stack.  If the stack is empty a stack underflow error is returned.
    fn pop(&mut self) -> error::Result<Value>;

    /// Copy the value `depth` places below the top of the stack, 0 being the top.
    fn peek(&self, depth: usize) -> error::Result<Value>;

    /// Pop the top value and attempt to convert it to an integer.  Booleans count as 0 and 1.
    fn pop_as_int(&mut self) -> error::Result<i64>;

    /// Pop the top value as an integer that may not be negative.
    fn pop_as_usize(&mut self) -> error::Result<usize>;

    /// Pop the top value and test it for truth.  Any value can be tested, so this only fails on an
    /// empty stack.
    fn pop_as_bool(&mut self) -> error::Result<bool>;

    /// Pop the top value as text.  Strings are taken as is and words give their name.
    fn pop_as_string(&mut self) -> error::Result<String>;

    /// Pop the top value, which has to be a word reference.
    fn pop_as_word(&mut self) -> error::Result<WordRef>;
}

/// Simplify registering a native regular word.
///
/// Required parameters are, the target to register with (the machine or the built-in word table).
/// The name of the word to register.  The word function handler to execute for the word.  A
/// simple description of the word.  As well as the word's stack signature.
#[macro_export]
macro_rules! add_native_word {
    (
        $target:expr ,
        $name:expr ,
        $function:expr ,
        $description:expr ,
        $signature:expr
    ) => {{
        use $crate::runtime::data_structures::word::WordRuntime;

        // Register the word while recording where in the source code the word was registered
        // from.
        $target.add_word(
            file!(),
            line!(),
            column!(),
            $name,
            $function,
            $description,
            $signature,
            WordRuntime::Normal,
        )
    }};
}

/// Simplify registering a native immediate word.  That is, this word is executed even when found
/// while compiling.
///
/// Required parameters are the same as for `add_native_word!`.
#[macro_export]
macro_rules! add_native_immediate_word {
    (
        $target:expr ,
        $name:expr ,
        $function:expr ,
        $description:expr ,
        $signature:expr
    ) => {{
        use $crate::runtime::data_structures::word::WordRuntime;

        $target.add_word(
            file!(),
            line!(),
            column!(),
            $name,
            $function,
            $description,
            $signature,
            WordRuntime::Immediate,
        )
    }};
}

/// Trait for managing and looking up the words known to the machine.
pub trait WordManagement {
    /// If currently set, the location of the token currently being processed.
    fn current_location(&self) -> &Option<SourceLocation>;

    /// Register a native word with the dictionary.  Use the `add_native_word!` macros rather than
    /// calling this directly, they fill in the location.
    #[allow(clippy::too_many_arguments)]
    fn add_word<F>(
        &mut self,
        file: &str,
        line: u32,
        column: u32,
        name: &str,
        handler: F,
        description: &str,
        signature: &str,
        runtime: WordRuntime,
    ) -> WordRef
    where
        F: Fn(&mut Machine) -> error::Result<()> + 'static;

    /// Find the current definition of a word by name.
    fn find_word(&self, name: &str) -> Option<WordRef>;

    /// Find one of the words the machine was started with, even if the name has since been
    /// redefined.
    fn builtin(&self, name: &str) -> error::Result<WordRef>;

    /// The dictionary of words known by the machine.
    fn dictionary(&self) -> &Dictionary;

    /// The chain of words executing right now, oldest first.
    fn call_stack(&self) -> CallStack;

    /// The name of the native word currently executing, or of the innermost running thread.
    fn executing_name(&self) -> String;
}

/// Trait for the inner interpreter: running words and stepping through threads.
pub trait ThreadManagement {
    /// The program counter of the thread currently running, if any.
    fn pc(&self) -> Option<&Pc>;

    fn return_stack(&self) -> &ReturnStack;

    /// Push a frame onto the return stack.
    fn push_frame(&mut self, frame: Frame);

    /// Pop a frame from the return stack.
    fn pop_frame(&mut self) -> error::Result<Frame>;

    /// Execute a word.  A primitive is simply invoked.  A composite is descended into through the
    /// return stack if a thread is already running, otherwise a new run is started and executed
    /// until it returns.
    fn execute(&mut self, word: &WordRef) -> error::Result<()>;

    /// Read the next cell of the running thread as an operand, moving past it.
    fn fetch_operand(&mut self) -> error::Result<Cell>;

    /// Move the running thread's program counter by a relative offset.
    fn jump(&mut self, offset: i64) -> error::Result<()>;

    /// Return from the running thread.  At the depth the current run started at this ends the run.
    fn exit_thread(&mut self) -> error::Result<()>;
}

/// Trait for managing the incoming token stream and the compilation of new words.
pub trait CodeManagement {
    /// Get the next token from the input, recording its location.
    fn next_token(&mut self) -> Option<Token>;

    /// Get the text of the next token, failing at the end of input.
    fn next_token_text(&mut self) -> error::Result<String>;

    /// Get the next raw character from the input.
    fn next_char(&mut self) -> Option<char>;

    /// Replace the input, returning the old one.
    fn set_input(&mut self, input: Box<dyn TokenSource>) -> Box<dyn TokenSource>;

    /// Is the machine interpreting (true) or compiling (false)?
    fn is_interpreting(&self) -> bool;

    fn set_interpreting(&mut self, interpreting: bool);

    /// The word new cells are compiled into.
    fn under_construction(&self) -> error::Result<WordRef>;

    /// Define a new, empty composite word and make it the word under construction.
    fn create_word(&mut self, name: &str) -> WordRef;

    /// Append a cell to the word under construction.
    fn compile_cell(&mut self, cell: Cell) -> error::Result<()>;

    /// Build a composite word directly from the translated tokens of the definition.  Unlike the
    /// outer interpreter no `lit` is inserted before values, so threads can be hand assembled with
    /// their branch offsets.
    fn compile_word(&mut self, name: &str, definition: &str, runtime: WordRuntime) -> WordRef;

    /// Interpret or compile a single token.
    fn process_token(&mut self, token: Token) -> error::Result<()>;

    /// Interpret or compile a single already translated value.
    fn process_value(&mut self, value: Value) -> error::Result<()>;

    /// Run all of the given source code, stopping at the first error.  The path parameter is used
    /// to represent the source code in error reporting.
    fn process_source(&mut self, path: &str, source: &str) -> error::ScriptResult<()>;

    /// Load and run a source file, stopping at the first error.
    fn process_source_file(&mut self, path: &str) -> error::ScriptResult<()>;

    /// Run the native outer interpreter over the current input until it runs out.
    fn interpret(&mut self, on_error: OnError) -> error::ScriptResult<()>;

    /// Run the current input through the threaded `init` word instead of the native outer
    /// interpreter.
    fn boot(&mut self, on_error: OnError) -> error::ScriptResult<()>;
}
