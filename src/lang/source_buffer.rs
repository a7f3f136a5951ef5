use std::{ fmt::{ self,
                  Display,
                  Formatter },
           hash::{ Hash,
                   Hasher },
           io::{ stdout,
                 BufRead,
                 Write } };
use tracing::warn;



/// The location in the source code where a token was found.  This structure is used all over the
/// machine to keep track where important things are found in the source code.  This is used
/// extensively in the error reporting.
///
/// This is a read-only structure.  Use the field accessor methods to get the values.
#[derive(Clone, PartialEq, PartialOrd, Eq)]
pub struct SourceLocation
{
    /// Either the path to the file or a description of the source code.  For example code entered
    /// in the REPL will have a tag of "\<repl\>".
    path: String,

    /// The 1 based line number in the source code where the token was found.
    line: usize,

    /// The 1 based column number in the source code where the token was found.
    column: usize
}


impl Hash for SourceLocation
{
    fn hash<H: Hasher>(&self, state: &mut H)
    {
        self.path.hash(state);
        self.line.hash(state);
        self.column.hash(state);
    }
}


/// Used for error reporting to show where in the source code an error originated.
impl Display for SourceLocation
{
    fn fmt(&self, formatter: &mut Formatter<'_>) -> Result<(), fmt::Error>
    {
        write!(formatter, "{} ({}, {})", self.path, self.line, self.column)
    }
}


impl fmt::Debug for SourceLocation
{
    fn fmt(&self, formatter: &mut Formatter<'_>) -> Result<(), fmt::Error>
    {
        write!(formatter, "{}", self)
    }
}


impl Default for SourceLocation
{
    fn default() -> Self
    {
        Self::new()
    }
}


impl SourceLocation
{
    /// Create a new SourceLocation with default values.
    pub fn new() -> SourceLocation
    {
        SourceLocation { path: "unspecified".to_string(), line: 1, column: 1 }
    }

    /// Create a new SourceLocation with the path to the source code.
    pub fn new_from_path(path: &str) -> Self
    {
        SourceLocation { path: path.to_owned(), line: 1, column: 1 }
    }

    /// Create a new SourceLocation with all of the needed information.  Native words use this to
    /// record where in the Rust code they were registered.
    pub fn new_from_info(path: &str, line: usize, column: usize) -> Self
    {
        SourceLocation { path: path.to_owned(), line, column }
    }

    /// The path to the source code or a meaningful description of the source code.
    pub fn path(&self) -> &String
    {
        &self.path
    }

    /// The 1 based line number in the source code.
    pub fn line(&self) -> usize
    {
        self.line
    }

    /// The 1 based column number in the source code.
    pub fn column(&self) -> usize
    {
        self.column
    }

    /// Move the location past the given character.  New lines reset the column and bump the line.
    fn advance(&mut self, next: char)
    {
        if next == '\n'
        {
            self.line += 1;
            self.column = 1;
        }
        else
        {
            self.column += 1;
        }
    }
}



/// A forward only cursor over characters that keeps track of where in the source it is.  The
/// tokenizer is written against this trait so that in-memory text and blocking readers can be
/// scanned the same way.
pub trait CharSource
{
    /// The location of the next character to be consumed.
    fn location(&self) -> &SourceLocation;

    /// Take a peek at the next character without consuming it.
    fn peek_next(&mut self) -> Option<char>;

    /// Get and consume the next character.
    fn next_char(&mut self) -> Option<char>;

    /// Throw away everything up to and including the next new line.
    fn discard_line(&mut self)
    {
        while let Some(next) = self.next_char()
        {
            if next == '\n'
            {
                break;
            }
        }
    }
}



/// A buffer for processing in-memory source code.  This buffer acts as a forward only iterator
/// over the code.  As characters are consumed the location of the cursor in that source is
/// maintained.
///
/// The buffer owns a copy of the text so it can be handed to the machine as a boxed token source
/// without tying the machine to the lifetime of the caller's string.
pub struct SourceBuffer
{
    /// The characters of the source code being processed.
    chars: Vec<char>,

    /// Index of the next character to be consumed.
    position: usize,

    /// The logical location of the cursor in the source code.
    location: SourceLocation
}


impl SourceBuffer
{
    /// Create a new SourceBuffer with the path to, or meaningful tag for the source code and the
    /// source code itself.
    pub fn new(path: &str, source: &str) -> Self
    {
        SourceBuffer
            {
                chars: source.chars().collect(),
                position: 0,
                location: SourceLocation::new_from_path(path)
            }
    }

    /// An empty buffer, the default input of a freshly created machine.
    pub fn empty() -> Self
    {
        SourceBuffer::new("<empty>", "")
    }
}


impl CharSource for SourceBuffer
{
    fn location(&self) -> &SourceLocation
    {
        &self.location
    }

    fn peek_next(&mut self) -> Option<char>
    {
        self.chars.get(self.position).copied()
    }

    fn next_char(&mut self) -> Option<char>
    {
        let next = self.peek_next()?;

        self.position += 1;
        self.location.advance(next);

        Some(next)
    }
}



/// A buffer over any blocking reader, such as stdin or an open file.  Text is pulled in one line
/// at a time, so the only point where the machine waits is when it has consumed everything it was
/// given so far.
pub struct ReaderBuffer<R: BufRead>
{
    /// Where the text comes from.
    reader: R,

    /// The line currently being scanned.
    line: Vec<char>,

    /// Index of the next character in the current line.
    position: usize,

    /// The logical location of the cursor in the source code.
    location: SourceLocation,

    /// Printed before every line read, if set.
    prompt: Option<String>,

    /// Set once the reader has reported the end of its data, or failed.
    exhausted: bool
}


impl<R: BufRead> ReaderBuffer<R>
{
    /// Create a buffer reading from the given reader.  The path is used for locations only.
    pub fn new(path: &str, reader: R) -> Self
    {
        ReaderBuffer
            {
                reader,
                line: Vec::new(),
                position: 0,
                location: SourceLocation::new_from_path(path),
                prompt: None,
                exhausted: false
            }
    }

    /// Print the given prompt to stdout whenever a new line is about to be read.
    pub fn with_prompt(mut self, prompt: &str) -> Self
    {
        self.prompt = Some(prompt.to_string());
        self
    }

    /// Make sure there is an unconsumed character in the line buffer, reading the next line if
    /// needed.  Returns false at the end of the input.
    fn fill(&mut self) -> bool
    {
        while self.position >= self.line.len()
        {
            if self.exhausted
            {
                return false;
            }

            if let Some(prompt) = &self.prompt
            {
                let mut out = stdout();
                let _ = write!(out, "{}", prompt);
                let _ = out.flush();
            }

            let mut text = String::new();

            match self.reader.read_line(&mut text)
            {
                Ok(0) => self.exhausted = true,

                Ok(_) =>
                    {
                        self.line = text.chars().collect();
                        self.position = 0;
                    },

                Err(error) =>
                    {
                        warn!(path = %self.location.path(), %error, "input read failed, treating as end of input");
                        self.exhausted = true;
                    }
            }
        }

        true
    }
}


impl<R: BufRead> CharSource for ReaderBuffer<R>
{
    fn location(&self) -> &SourceLocation
    {
        &self.location
    }

    fn peek_next(&mut self) -> Option<char>
    {
        if !self.fill()
        {
            return None;
        }

        Some(self.line[self.position])
    }

    fn next_char(&mut self) -> Option<char>
    {
        let next = self.peek_next()?;

        self.position += 1;
        self.location.advance(next);

        Some(next)
    }

    /// Only the rest of the line already read is thrown away, we never block waiting for a line
    /// just to discard it.
    fn discard_line(&mut self)
    {
        while self.position < self.line.len()
        {
            let _ = self.next_char();
        }
    }
}
