use std::{ cell::{ self,
                   Ref,
                   RefCell },
           fmt::{ self,
                  Debug,
                  Display,
                  Formatter },
           rc::Rc };
use crate::{ lang::source_buffer::SourceLocation,
             runtime::{ data_structures::value::Value,
                        error::{ self,
                                 MachineError },
                        interpreter::Machine } };



/// Definition of a primitive word's handler.  This is the function that is called when the word is
/// executed.  Can be a lambda, a callable object or a Rust function.
pub type WordHandler = dyn Fn(&mut Machine) -> error::Result<()>;


/// Shared handle to a word.  The dictionary, compiled threads, the data stack and in-flight program
/// counters all hold words through this handle, never by value.
pub type WordRef = Rc<Word>;


/// When a word runs when the outer interpreter finds it while compiling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WordRuntime
{
    /// The word is executed immediately, even while compiling.
    Immediate,

    /// The word is appended to the word under construction while compiling.
    Normal
}


/// A single slot in a composite word's thread.
#[derive(Clone, Debug)]
pub enum Cell
{
    /// Execute this word when reached.
    Word(WordRef),

    /// Push this value when reached, or hand it to a word like `lit` or `branch` that reads its
    /// operand from the thread.
    Literal(Value)
}


/// What a word does when executed.
pub enum WordBody
{
    /// Native code.
    Primitive(Rc<WordHandler>),

    /// A thread of cells run by the inner interpreter.  The cells are in a RefCell because the word
    /// under construction grows while other handles to it already exist.
    Composite(RefCell<Vec<Cell>>)
}


/// A named unit of executable behavior.
///
/// Once created a word's name and body kind never change.  A composite's thread only ever grows,
/// and redefining a name creates a brand new word instead of touching this one.
pub struct Word
{
    /// The name the word was defined under.
    name: String,

    /// Immediate or normal, flipped by the `immediate` word after creation.
    runtime: cell::Cell<WordRuntime>,

    /// Native handler or thread.
    body: WordBody,

    /// Where the word was defined, in Forth or Rust source.
    location: SourceLocation,

    /// A simple description of the word.
    description: String,

    /// The stack signature of the word.
    signature: String
}


impl Cell
{
    /// Turn a value popped off of the data stack into a cell, word references become word cells.
    pub fn from_value(value: Value) -> Cell
    {
        match value
        {
            Value::Word(word) => Cell::Word(word),
            other             => Cell::Literal(other)
        }
    }

    /// Turn the cell back into a value, the way `lit` and `'` push it.
    pub fn to_value(&self) -> Value
    {
        match self
        {
            Cell::Word(word)     => Value::Word(word.clone()),
            Cell::Literal(value) => value.clone()
        }
    }
}


/// Word cells are equal only when they refer to the very same word object.
impl PartialEq for Cell
{
    fn eq(&self, other: &Cell) -> bool
    {
        match ( self, other )
        {
            ( Cell::Word(a),    Cell::Word(b)    ) => Rc::ptr_eq(a, b),
            ( Cell::Literal(a), Cell::Literal(b) ) => a == b,
            _                                      => false
        }
    }
}


impl Display for Cell
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        match self
        {
            Cell::Word(word)     => write!(f, "{}", word.name()),
            Cell::Literal(value) => write!(f, "{}", value)
        }
    }
}


impl Debug for Word
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        write!(f, "Word({})", self.name)
    }
}


impl Word
{
    /// Create a new native word.
    pub fn new_primitive(name: String,
                         handler: Rc<WordHandler>,
                         location: SourceLocation,
                         description: String,
                         signature: String,
                         runtime: WordRuntime) -> Word
    {
        Word
            {
                name,
                runtime: cell::Cell::new(runtime),
                body: WordBody::Primitive(handler),
                location,
                description,
                signature
            }
    }

    /// Create a new, empty composite word.  The cells are filled in as the word is compiled.
    pub fn new_composite(name: String, location: SourceLocation) -> Word
    {
        Word::with_cells(name, location, Vec::new())
    }

    /// Create a composite word with an already assembled thread.
    pub fn with_cells(name: String, location: SourceLocation, cells: Vec<Cell>) -> Word
    {
        Word
            {
                name,
                runtime: cell::Cell::new(WordRuntime::Normal),
                body: WordBody::Composite(RefCell::new(cells)),
                location,
                description: String::new(),
                signature: String::new()
            }
    }

    pub fn name(&self) -> &String
    {
        &self.name
    }

    pub fn location(&self) -> &SourceLocation
    {
        &self.location
    }

    pub fn description(&self) -> &String
    {
        &self.description
    }

    pub fn signature(&self) -> &String
    {
        &self.signature
    }

    pub fn body(&self) -> &WordBody
    {
        &self.body
    }

    pub fn is_primitive(&self) -> bool
    {
        matches!(self.body, WordBody::Primitive(_))
    }

    pub fn is_immediate(&self) -> bool
    {
        self.runtime.get() == WordRuntime::Immediate
    }

    /// Flag the word as immediate.  This is the only state a word allows changing after creation,
    /// other than growing its thread.
    pub fn mark_immediate(&self)
    {
        self.runtime.set(WordRuntime::Immediate);
    }

    /// Append a cell to the end of a composite word's thread.  Primitives have no thread to grow.
    pub fn append(&self, cell: Cell) -> error::Result<()>
    {
        match &self.body
        {
            WordBody::Composite(cells) =>
                {
                    cells.borrow_mut().push(cell);
                    Ok(())
                },

            WordBody::Primitive(_) =>
                Err(MachineError::NativeOperationFailure
                    {
                        word: self.name.clone(),
                        message: "can not compile into a native word".to_string()
                    })
        }
    }

    /// Get a copy of the cell at the given index of the thread, if there is one.
    pub fn cell(&self, index: usize) -> Option<Cell>
    {
        match &self.body
        {
            WordBody::Composite(cells) => cells.borrow().get(index).cloned(),
            WordBody::Primitive(_)     => None
        }
    }

    /// Borrow the thread of a composite word.  None for primitives.
    pub fn cells(&self) -> Option<Ref<'_, Vec<Cell>>>
    {
        match &self.body
        {
            WordBody::Composite(cells) => Some(cells.borrow()),
            WordBody::Primitive(_)     => None
        }
    }

    /// Length of the thread, zero for primitives.
    pub fn len(&self) -> usize
    {
        match &self.body
        {
            WordBody::Composite(cells) => cells.borrow().len(),
            WordBody::Primitive(_)     => 0
        }
    }

    pub fn is_empty(&self) -> bool
    {
        self.len() == 0
    }
}



#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn composites_grow_through_shared_handles()
    {
        let word: WordRef = Rc::new(Word::new_composite("w".to_string(), SourceLocation::new()));
        let other = word.clone();

        other.append(Cell::Literal(Value::Int(1))).unwrap();
        word.append(Cell::Literal(Value::Int(2))).unwrap();

        assert_eq!(word.len(), 2);
        assert_eq!(other.cell(1), Some(Cell::Literal(Value::Int(2))));
        assert_eq!(word.cell(2), None);
    }

    #[test]
    fn primitives_can_not_be_appended_to()
    {
        let handler: Rc<WordHandler> = Rc::new(|_: &mut Machine| -> error::Result<()> { Ok(()) });
        let word = Word::new_primitive("p".to_string(),
                                       handler,
                                       SourceLocation::new(),
                                       String::new(),
                                       String::new(),
                                       WordRuntime::Normal);

        assert!(word.append(Cell::Literal(Value::Int(1))).is_err());
        assert!(word.is_primitive());
        assert!(word.cells().is_none());
    }

    #[test]
    fn immediate_flag_is_set_in_place()
    {
        let word = Word::new_composite("w".to_string(), SourceLocation::new());

        assert!(!word.is_immediate());
        word.mark_immediate();
        assert!(word.is_immediate());
    }
}
