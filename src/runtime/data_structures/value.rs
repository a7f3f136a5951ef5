use std::{ cmp::Ordering,
           fmt::{ self,
                  Display,
                  Formatter },
           rc::Rc };
use crate::runtime::data_structures::word::WordRef;



/// Core value enumeration used by the machine.  Everything that can live on the data stack, in a
/// variable, or inline in a composite word's thread is one of these.
#[derive(Clone, Debug)]
pub enum Value
{
    /// We have an integer value.  Represented as an i64.
    Int(i64),

    /// A floating-point value.  Represented as a f64.
    Float(f64),

    /// A boolean value.
    Bool(bool),

    /// A string value, also the fallback for any token the translator could not make sense of.
    String(String),

    /// A handle to a word in the dictionary, or to an older definition of one.
    Word(WordRef)
}


/// Convert an arbitrary data type to a Value.
pub trait ToValue
{
    /// Implement to handle the actual conversion.
    fn to_value(&self) -> Value;
}


/// Manage equality for the Value enumeration.  Integers and floats compare by numeric value, words
/// compare by identity, so an old definition is never equal to its replacement.
impl PartialEq for Value
{
    fn eq(&self, other: &Value) -> bool
    {
        match ( self, other )
        {
            ( Value::Word(a),   Value::Word(b)   ) => Rc::ptr_eq(a, b),
            ( Value::String(a), Value::String(b) ) => a == b,
            ( Value::Bool(a),   Value::Bool(b)   ) => a == b,
            ( Value::Int(a),    Value::Int(b)    ) => a == b,

            _ if Value::both_are_numeric(self, other) => self.get_float_val() == other.get_float_val(),

            _ => false
        }
    }
}


/// Numbers order numerically and strings order lexically.  Nothing else is ordered.
impl PartialOrd for Value
{
    fn partial_cmp(&self, other: &Value) -> Option<Ordering>
    {
        match ( self, other )
        {
            ( Value::Int(a),    Value::Int(b)    ) => a.partial_cmp(b),
            ( Value::String(a), Value::String(b) ) => a.partial_cmp(b),
            ( Value::Bool(a),   Value::Bool(b)   ) => a.partial_cmp(b),

            _ if Value::both_are_numeric(self, other) =>
                self.get_float_val().partial_cmp(&other.get_float_val()),

            _ => None
        }
    }
}


/// Pretty print the value for display.  Floats always carry a decimal point so that printed values
/// translate back to the same type.
impl Display for Value
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        match self
        {
            Value::Int(value)    => write!(f, "{}", value),
            Value::Float(value)  => write!(f, "{:?}", value),
            Value::Bool(value)   => write!(f, "{}", value),
            Value::String(value) => write!(f, "{}", value),
            Value::Word(word)    => write!(f, "{}", word.name())
        }
    }
}


/// Define implementations for converting between Values and the raw data types they represent.
macro_rules! value_conversion
{
    ($data_type:ty , $variant:ident) =>
    {
        #[doc = concat!("Allow conversion from ", stringify!($data_type), " to a Value.")]
        impl ToValue for $data_type
        {
            fn to_value(&self) -> Value
            {
                Value::$variant(self.clone())
            }
        }


        #[doc = concat!("Support converting from a ", stringify!($data_type), " to a Value.")]
        impl From<$data_type> for Value
        {
            fn from(original: $data_type) -> Value
            {
                Value::$variant(original)
            }
        }
    };
}


value_conversion!(i64,     Int);
value_conversion!(f64,     Float);
value_conversion!(bool,    Bool);
value_conversion!(String,  String);
value_conversion!(WordRef, Word);


/// Convenience implementation for converting a usize to a Value.  The usize type is not represented
/// directly in the Value enumeration, so it is converted to an i64 internally.
impl ToValue for usize
{
    fn to_value(&self) -> Value
    {
        Value::Int(*self as i64)
    }
}


impl From<&str> for Value
{
    fn from(original: &str) -> Value
    {
        Value::String(original.to_string())
    }
}


impl Value
{
    /// Is the value an integer or a float?
    pub fn is_numeric(&self) -> bool
    {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Are both values numeric types?
    pub fn both_are_numeric(a: &Value, b: &Value) -> bool
    {
        a.is_numeric() && b.is_numeric()
    }

    /// Is the value a reference to a word?
    pub fn is_word(&self) -> bool
    {
        matches!(self, Value::Word(_))
    }

    /// The falsy values are `0`, `0.0`, `false` and the empty string.  Everything else, words
    /// included, is true.
    pub fn is_truthy(&self) -> bool
    {
        match self
        {
            Value::Int(value)    => *value != 0,
            Value::Float(value)  => *value != 0.0,
            Value::Bool(value)   => *value,
            Value::String(value) => !value.is_empty(),
            Value::Word(_)       => true
        }
    }

    /// Convert the value to a floating point value.  Only meaningful for numeric values, anything
    /// else reads as NaN.
    pub fn get_float_val(&self) -> f64
    {
        match self
        {
            Value::Int(value)   => *value as f64,
            Value::Float(value) => *value,
            Value::Bool(value)  => if *value { 1.0 } else { 0.0 },
            _                   => f64::NAN
        }
    }

    /// The name of the value's type, for error messages.
    pub fn type_name(&self) -> &'static str
    {
        match self
        {
            Value::Int(_)    => "integer",
            Value::Float(_)  => "float",
            Value::Bool(_)   => "boolean",
            Value::String(_) => "string",
            Value::Word(_)   => "word"
        }
    }
}
