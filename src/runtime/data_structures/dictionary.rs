use crate::runtime::{
    data_structures::word::WordRef,
    error::{self, MachineError},
};
use std::{
    collections::HashMap,
    fmt::{self, Display, Formatter},
};

/// The dictionary used by the machine to keep track of every word it knows by name.  Defining a
/// name that already exists replaces the entry, the old word lives on for as long as something
/// still refers to it.
pub struct Dictionary {
    words: HashMap<String, WordRef>,
    last_defined: Option<WordRef>,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

/// Pretty print the dictionary, one line per word sorted by name.
impl Display for Dictionary {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        let words = self.words();
        let max_size = words.iter().map(|word| word.name().len()).max().unwrap_or(0);

        write!(formatter, "{} words defined.\n\n", words.len())?;

        for word in words.iter() {
            write!(formatter, "{:width$}", word.name(), width = max_size)?;

            if word.is_immediate() {
                write!(formatter, "  immediate")?;
            } else {
                write!(formatter, "           ")?;
            }

            writeln!(formatter, "  --  {}", word.description())?;
        }

        Ok(())
    }
}

impl Dictionary {
    /// Create a new empty dictionary.
    pub fn new() -> Dictionary {
        Dictionary {
            words: HashMap::new(),
            last_defined: None,
        }
    }

    /// Find the current definition of a name.
    pub fn lookup(&self, name: &str) -> Option<WordRef> {
        self.words.get(name).cloned()
    }

    /// Insert the word under its own name, replacing any previous definition, and remember it as
    /// the most recent definition.
    pub fn define(&mut self, word: WordRef) {
        let _ = self.words.insert(word.name().clone(), word.clone());
        self.last_defined = Some(word);
    }

    /// The most recently defined word.
    pub fn last(&self) -> error::Result<WordRef> {
        self.last_defined.clone().ok_or(MachineError::NothingDefined)
    }

    /// All current definitions sorted by name.
    pub fn words(&self) -> Vec<WordRef> {
        let mut words: Vec<WordRef> = self.words.values().cloned().collect();

        words.sort_by(|a, b| a.name().cmp(b.name()));
        words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        lang::source_buffer::SourceLocation,
        runtime::data_structures::word::Word,
    };
    use std::rc::Rc;

    fn composite(name: &str) -> WordRef {
        Rc::new(Word::new_composite(name.to_string(), SourceLocation::new()))
    }

    #[test]
    fn last_fails_when_nothing_is_defined() {
        let dictionary = Dictionary::new();

        assert_eq!(dictionary.last().unwrap_err(), MachineError::NothingDefined);
        assert!(dictionary.lookup("x").is_none());
    }

    #[test]
    fn most_recent_definition_wins() {
        let mut dictionary = Dictionary::new();
        let first = composite("x");
        let second = composite("x");

        dictionary.define(first.clone());
        dictionary.define(composite("y"));
        dictionary.define(second.clone());

        assert_eq!(dictionary.len(), 2);
        assert!(Rc::ptr_eq(&dictionary.lookup("x").unwrap(), &second));
        assert!(Rc::ptr_eq(&dictionary.last().unwrap(), &second));
        assert!(!Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn listing_is_sorted_and_marks_immediates() {
        let mut dictionary = Dictionary::new();
        let zeta = composite("zeta");

        zeta.mark_immediate();
        dictionary.define(zeta);
        dictionary.define(composite("alpha"));

        let listing = dictionary.to_string();
        let alpha_at = listing.find("alpha").unwrap();
        let zeta_at = listing.find("zeta").unwrap();

        assert!(listing.starts_with("2 words defined."));
        assert!(alpha_at < zeta_at);
        assert!(listing.lines().any(|line| line.starts_with("zeta") && line.contains("immediate")));
        assert!(!listing.lines().any(|line| line.starts_with("alpha") && line.contains("immediate")));
    }
}
