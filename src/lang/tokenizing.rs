use crate::lang::source_buffer::{CharSource, SourceBuffer, SourceLocation};
use std::{
    fmt::{self, Debug, Display, Formatter},
    hash::{Hash, Hasher},
};

/// A token is the simple unit of the language: a maximal run of non-whitespace characters.  What
/// the text means is decided later by the translator, the tokenizer only knows where the token
/// was found.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    /// Where in the source the first character of the token was found.
    location: SourceLocation,

    /// The raw text of the token.
    text: String,
}

/// A list of tokens found in the source code.
pub type TokenList = Vec<Token>;

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.location.hash(state);
        self.text.hash(state);
    }
}

/// Print just the text of the token.
impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Include the original location for debugging purposes.
impl Debug for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.text)
    }
}

impl Token {
    pub fn new(location: SourceLocation, text: String) -> Self {
        Token { location, text }
    }

    /// Get the token's location in the original source text.
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// The raw text of the token.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Take the text out of the token.
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Check if the given character is considered whitespace.
pub fn is_whitespace(next: &char) -> bool {
    matches!(*next, ' ' | '\t' | '\r' | '\n' | '\x0c')
}

/// Skip over whitespace in the text.  Stopping only at either the end of the buffer or the next
/// non-whitespace character.
fn skip_whitespace(buffer: &mut (impl CharSource + ?Sized)) {
    while let Some(next) = buffer.peek_next() {
        if !is_whitespace(&next) {
            break;
        }

        let _ = buffer.next_char();
    }
}

/// Gather characters until the next whitespace character or the end of the buffer.  The
/// terminating whitespace is left in the buffer.
fn process_until_whitespace(buffer: &mut (impl CharSource + ?Sized)) -> (SourceLocation, String) {
    let location = buffer.location().clone();
    let mut text = String::new();

    while let Some(next) = buffer.peek_next() {
        if is_whitespace(&next) {
            break;
        }

        text.push(next);
        let _ = buffer.next_char();
    }

    (location, text)
}

/// The machine's view of its input.  Besides whole tokens the machine can take single characters
/// for the `key` word and drop the rest of a line after an error.
///
/// Every CharSource is a TokenSource, so both the in-memory SourceBuffer and the blocking
/// ReaderBuffer can be handed to the machine.
pub trait TokenSource: CharSource {
    /// Read the next whitespace delimited token, or None once the source is exhausted.
    fn next_token(&mut self) -> Option<Token> {
        skip_whitespace(self);

        self.peek_next()?;

        let (location, text) = process_until_whitespace(self);
        Some(Token::new(location, text))
    }
}

impl<T: CharSource> TokenSource for T {}

/// Tokenize the source code from a string.
pub fn tokenize_from_source(path: &str, source: &str) -> TokenList {
    let mut buffer = SourceBuffer::new(path, source);
    let mut token_list = TokenList::new();

    // Keep going until we hit the end of the buffer.
    while let Some(token) = buffer.next_token() {
        token_list.push(token);
    }

    token_list
}
