use crate::runtime::{
    data_structures::{program_counter::Pc, value::Value},
    error::{self, MachineError},
};
use std::fmt::{self, Display, Formatter};

/// Which of the machine's stacks a Stack is.  Carried by underflow errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StackKind {
    Data,
    Return,
}

impl Display for StackKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            StackKind::Data => write!(f, "data"),
            StackKind::Return => write!(f, "return"),
        }
    }
}

/// An entry on the return stack.
#[derive(Clone, Debug)]
pub enum Frame {
    /// Where to resume a calling thread.
    Call(Pc),

    /// A value parked by `>r`.
    Value(Value),
}

/// A growable LIFO stack that knows which stack it is and how deep it has ever been.
pub struct Stack<T> {
    kind: StackKind,
    items: Vec<T>,
    max_depth: usize,
}

/// The stack of values operated on by words.
pub type DataStack = Stack<Value>;

/// The stack of saved program counters and parked values.
pub type ReturnStack = Stack<Frame>;

impl<T> Stack<T> {
    pub fn new(kind: StackKind) -> Stack<T> {
        Stack {
            kind,
            items: Vec::with_capacity(20),
            max_depth: 0,
        }
    }

    /// The deepest the stack has been since it was created.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The items from bottom to top.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);

        if self.items.len() > self.max_depth {
            self.max_depth = self.items.len();
        }
    }

    pub fn pop(&mut self) -> error::Result<T> {
        self.items.pop().ok_or(MachineError::StackUnderflow(self.kind))
    }

    /// Look at the item `depth` places below the top without removing it, 0 being the top.
    pub fn peek(&self, depth: usize) -> error::Result<&T> {
        if depth >= self.items.len() {
            return Err(MachineError::StackUnderflow(self.kind));
        }

        Ok(&self.items[self.items.len() - 1 - depth])
    }

    /// Drop everything above the given depth.
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
