use std::{ collections::HashMap,
           io::{ stdout,
                 Write },
           rc::Rc };
use tracing::debug;
use crate::{ lang::{ source_buffer::{ SourceBuffer,
                                      SourceLocation },
                     tokenizing::TokenSource },
             runtime::{ built_ins::BUILT_IN_WORDS,
                        data_structures::{ dictionary::Dictionary,
                                           program_counter::Pc,
                                           stack::{ DataStack,
                                                    Frame,
                                                    ReturnStack,
                                                    Stack,
                                                    StackKind },
                                           value::Value,
                                           word::{ Word,
                                                   WordHandler,
                                                   WordRef,
                                                   WordRuntime } },
                        error::{ self,
                                 script_error,
                                 MachineError },
                        interpreter::{ CallItem,
                                       CallStack,
                                       CodeManagement,
                                       InterpreterStack,
                                       WordManagement } } };



/// The threaded outer interpreter.  Reads a token, looks it up, and either executes it, compiles
/// it, pushes it, or compiles it as a literal, then loops.  Offsets are relative to the cell after
/// the branch's operand.
const INTERPRET_THREAD: &str = "[ word dup 0branch 26 \
                                  word_from_name 0branch 12 \
                                  dup is_immediate forth_interpret or 0branch 3 \
                                  exec branch -16 \
                                  , branch -19 \
                                  forth_interpret 0branch 2 branch -24 \
                                  ' lit , , branch -30 \
                                  drop exit";


/// Entry point of the threaded outer interpreter.
const INIT_THREAD: &str = "interpret exit";



/// The virtual machine.  Owns the dictionary, both stacks, the running thread's program counter,
/// the compile state and the input and output the I/O words use.
///
/// All words, native or not, get the machine by mutable reference, so there is no state outside
/// of it and two machines share nothing.
pub struct Machine
{
    /// The dictionary of words known by the machine.
    pub(super) dictionary: Dictionary,

    /// The words the machine was started with, by name.  Unlike the dictionary these can not be
    /// redefined, the outer interpreter and decompiler rely on them.
    pub(super) builtins: HashMap<String, WordRef>,

    /// The data stack.
    pub(super) stack: DataStack,

    /// Saved program counters of suspended callers, and values parked by `>r`.
    pub(super) return_stack: ReturnStack,

    /// The program counter of the running thread.
    pub(super) pc: Option<Pc>,

    /// Depth of the return stack when the current top level run started.
    pub(super) run_base: usize,

    /// The compile flag.  True while interpreting, false while compiling.
    pub(super) interpreting: bool,

    /// The word that compiled cells are appended to.  Stays set after `;`.
    pub(super) under_construction: Option<WordRef>,

    /// Values stored by `!`.
    pub(super) variables: HashMap<String, Value>,

    /// The native word being invoked right now, if any.
    pub(super) executing: Option<WordRef>,

    /// The call stack as it was when the current error was raised.
    pub(super) fault: Option<CallStack>,

    /// The location of the token last read from the input.
    pub(super) current_location: Option<SourceLocation>,

    /// Set by `bye`.  The outer interpreters stop reading once this is set.
    pub(super) finished: bool,

    /// Where tokens come from.
    pub(super) input: Box<dyn TokenSource>,

    /// Where the I/O words write to.
    pub(super) output: Box<dyn Write>
}


impl InterpreterStack for Machine
{
    fn stack_max_depth(&self) -> usize
    {
        self.stack.max_depth()
    }

    fn stack(&self) -> &DataStack
    {
        &self.stack
    }

    fn push(&mut self, value: Value)
    {
        self.stack.push(value);
    }

    fn pop(&mut self) -> error::Result<Value>
    {
        self.stack.pop()
    }

    fn peek(&self, depth: usize) -> error::Result<Value>
    {
        self.stack.peek(depth).cloned()
    }

    fn pop_as_int(&mut self) -> error::Result<i64>
    {
        match self.pop()?
        {
            Value::Int(value)  => Ok(value),
            Value::Bool(value) => Ok(value as i64),
            other              => script_error(self, format!("expected an integer, found {} {}",
                                                             other.type_name(),
                                                             other))
        }
    }

    fn pop_as_usize(&mut self) -> error::Result<usize>
    {
        let value = self.pop_as_int()?;

        if value < 0
        {
            return script_error(self, format!("expected a non-negative integer, found {}", value));
        }

        Ok(value as usize)
    }

    fn pop_as_bool(&mut self) -> error::Result<bool>
    {
        Ok(self.pop()?.is_truthy())
    }

    fn pop_as_string(&mut self) -> error::Result<String>
    {
        match self.pop()?
        {
            Value::String(value) => Ok(value),
            Value::Word(word)    => Ok(word.name().clone()),
            other                => script_error(self, format!("expected a string, found {} {}",
                                                               other.type_name(),
                                                               other))
        }
    }

    fn pop_as_word(&mut self) -> error::Result<WordRef>
    {
        match self.pop()?
        {
            Value::Word(word) => Ok(word),
            other             => Err(MachineError::UnknownCell(other.to_string()))
        }
    }
}


impl WordManagement for Machine
{
    fn current_location(&self) -> &Option<SourceLocation>
    {
        &self.current_location
    }

    fn add_word<F>(&mut self,
                   file: &str,
                   line: u32,
                   column: u32,
                   name: &str,
                   handler: F,
                   description: &str,
                   signature: &str,
                   runtime: WordRuntime) -> WordRef
        where
            F: Fn(&mut Machine) -> error::Result<()> + 'static
    {
        let location = SourceLocation::new_from_info(file, line as usize, column as usize);
        let handler: Rc<WordHandler> = Rc::new(handler);

        let word = Rc::new(Word::new_primitive(name.to_string(),
                                               handler,
                                               location,
                                               description.to_string(),
                                               signature.to_string(),
                                               runtime));

        self.dictionary.define(word.clone());
        let _ = self.builtins.insert(name.to_string(), word.clone());

        word
    }

    fn find_word(&self, name: &str) -> Option<WordRef>
    {
        self.dictionary.lookup(name)
    }

    fn builtin(&self, name: &str) -> error::Result<WordRef>
    {
        self.builtins
            .get(name)
            .cloned()
            .ok_or_else(|| MachineError::UnknownCell(name.to_string()))
    }

    fn dictionary(&self) -> &Dictionary
    {
        &self.dictionary
    }

    fn call_stack(&self) -> CallStack
    {
        let mut call_stack = CallStack::with_capacity(self.return_stack.len() + 2);

        for frame in self.return_stack.items()
        {
            if let Frame::Call(pc) = frame
            {
                call_stack.push(CallItem::from_pc(pc));
            }
        }

        if let Some(pc) = &self.pc
        {
            call_stack.push(CallItem::from_pc(pc));
        }

        if let Some(word) = &self.executing
        {
            call_stack.push(CallItem::new(word.name().clone(), word.location().clone(), None));
        }

        call_stack
    }

    fn executing_name(&self) -> String
    {
        if let Some(word) = &self.executing
        {
            return word.name().clone();
        }

        match &self.pc
        {
            Some(pc) => pc.word().name().clone(),
            None     => "<top level>".to_string()
        }
    }
}


impl Machine
{
    /// Create a new machine writing to stdout.  It reads from an empty input until one is set.
    pub fn new() -> Machine
    {
        Machine::with_output(Box::new(stdout()))
    }

    /// Create a new machine writing its output to the given sink.
    ///
    /// All of the built-in native words are registered and then the threaded outer interpreter
    /// words `interpret` and `init` are assembled from them.
    pub fn with_output(output: Box<dyn Write>) -> Machine
    {
        let mut machine = Machine
            {
                dictionary: Dictionary::new(),
                builtins: HashMap::new(),

                stack: Stack::new(StackKind::Data),
                return_stack: Stack::new(StackKind::Return),

                pc: None,
                run_base: 0,

                interpreting: true,
                under_construction: None,

                variables: HashMap::new(),

                executing: None,
                fault: None,
                current_location: None,
                finished: false,

                input: Box::new(SourceBuffer::empty()),
                output
            };

        for native in BUILT_IN_WORDS.iter()
        {
            let _ = machine.add_word(native.location.path(),
                                     native.location.line() as u32,
                                     native.location.column() as u32,
                                     &native.name,
                                     native.handler,
                                     &native.description,
                                     &native.signature,
                                     native.runtime);
        }

        for ( name, definition ) in [ ( "interpret", INTERPRET_THREAD ), ( "init", INIT_THREAD ) ]
        {
            let word = machine.compile_word(name, definition, WordRuntime::Normal);
            let _ = machine.builtins.insert(name.to_string(), word);
        }

        debug!(words = machine.dictionary.len(), "machine initialized");

        machine
    }

    /// Write text to the machine's output.  A failed write is blamed on the executing word.
    pub fn write_output(&mut self, text: &str) -> error::Result<()>
    {
        let result = self.output
                         .write_all(text.as_bytes())
                         .and_then(|()| self.output.flush());

        match result
        {
            Ok(())     => Ok(()),
            Err(error) => script_error(self, format!("write failed: {}", error))
        }
    }

    /// Look up a variable stored with `!`.
    pub fn variable(&self, name: &str) -> Option<&Value>
    {
        self.variables.get(name)
    }

    /// Store a variable, as `!` does.
    pub fn set_variable(&mut self, name: String, value: Value)
    {
        let _ = self.variables.insert(name, value);
    }

    /// Ask the outer interpreters to stop reading input, and stop the running thread.
    pub fn finish(&mut self)
    {
        self.finished = true;
        self.pc = None;
        self.return_stack.truncate(self.run_base);
    }

    pub fn is_finished(&self) -> bool
    {
        self.finished
    }

    /// Put the machine back into a clean top level state after an error.  The data stack and the
    /// dictionary are left alone.
    pub fn reset_run_state(&mut self)
    {
        self.return_stack.clear();
        self.pc = None;
        self.run_base = 0;
        self.executing = None;
        self.interpreting = true;
    }
}


impl Default for Machine
{
    fn default() -> Self
    {
        Self::new()
    }
}
