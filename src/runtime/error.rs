use std::{ fmt::{ self, Debug, Display, Formatter },
           process::{ ExitCode, Termination } };
use thiserror::Error;
use crate::{ runtime::{ data_structures::stack::StackKind,
                        interpreter::{ CallStack,
                                       Machine,
                                       WordManagement } },
             lang::source_buffer::SourceLocation };



/// Everything that can go wrong while the machine runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MachineError
{
    /// Pop of an empty stack.
    #[error("{0} stack underflow")]
    StackUnderflow(StackKind),

    /// Something that is not a word was found where a word had to be executed, or the return
    /// stack held the wrong kind of frame.
    #[error("can not execute {0}")]
    UnknownCell(String),

    /// A primitive's operation failed.
    #[error("{word}: {message}")]
    NativeOperationFailure
    {
        word: String,
        message: String
    },

    #[error("no word is under construction")]
    NothingDefined,

    /// A thread operand was requested, or a thread exited, outside of any running thread.
    #[error("no thread is running")]
    NoActiveThread,

    #[error("read past the end of the thread")]
    ThreadExhausted,

    #[error("branch to cell {target} is outside of {word}")]
    InvalidBranch
    {
        word: String,
        target: i64
    },

    #[error("unexpected end of input")]
    EndOfInput,

    #[error("I/O error: {0}")]
    Io(String)
}


/// Allow for the conversion of a std::io::Error into a MachineError.
impl From<std::io::Error> for MachineError
{
    fn from(error: std::io::Error) -> MachineError
    {
        MachineError::Io(error.to_string())
    }
}



pub type Result<T> = std::result::Result<T, MachineError>;

pub type ScriptResult<T> = std::result::Result<T, ScriptError>;



/// An error that stopped a run of Forth code, along with where in the source it happened and which
/// words were executing at the time.
#[derive(Clone)]
pub struct ScriptError
{
    /// The location in the source code of the token being processed, if available.
    location: Option<SourceLocation>,

    /// What went wrong.
    error: MachineError,

    /// The machine's call stack at the time of the error, if available.
    call_stack: Option<CallStack>
}


impl std::error::Error for ScriptError
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)>
    {
        Some(&self.error)
    }
}


/// When returned from main, convert the error result to an operating system exit code.
impl Termination for ScriptError
{
    /// Because this type represents an error, the exit code is always FAILURE.
    fn report(self) -> ExitCode
    {
        eprintln!("Error: {}", self);
        ExitCode::FAILURE
    }
}


/// Pretty print the ScriptError for the user.
impl Display for ScriptError
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        match &self.location
        {
            Some(location) => write!(f, "{}: {}", location, self.error)?,
            None => write!(f, "{}", self.error)?
        }

        if let Some(call_stack) = &self.call_stack
            && !call_stack.is_empty()
        {
            write!(f, "\n\nCall stack\n")?;

            for item in call_stack.iter().rev()
            {
                writeln!(f, "  {}", item)?;
            }
        }

        Ok(())
    }
}


impl Debug for ScriptError
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        write!(f, "{}", self)
    }
}


impl ScriptError
{
    /// Create a new ScriptError.
    pub fn new(location: Option<SourceLocation>,
               error: MachineError,
               call_stack: Option<CallStack>) -> ScriptError
    {
        ScriptError
            {
                location,
                error,
                call_stack
            }
    }

    /// If available, the location in the source code the error occurred.
    pub fn location(&self) -> &Option<SourceLocation>
    {
        &self.location
    }

    /// The error itself.
    pub fn error(&self) -> &MachineError
    {
        &self.error
    }

    /// If available, the machine's call stack at the time of the error.
    pub fn call_stack(&self) -> &Option<CallStack>
    {
        &self.call_stack
    }
}


impl From<MachineError> for ScriptError
{
    fn from(error: MachineError) -> ScriptError
    {
        ScriptError::new(None, error, None)
    }
}


/// Allow for the conversion of a std::io::Error into a ScriptError.
impl From<std::io::Error> for ScriptError
{
    fn from(error: std::io::Error) -> ScriptError
    {
        ScriptError::new(None, error.into(), None)
    }
}



/// A convenience function for failing a primitive, attributing the failure to the word currently
/// executing on the machine.
pub fn script_error<T>(machine: &Machine, message: String) -> Result<T>
{
    Err(MachineError::NativeOperationFailure { word: machine.executing_name(), message })
}



pub fn script_error_str<T>(machine: &Machine, message: &str) -> Result<T>
{
    script_error(machine, message.to_string())
}
