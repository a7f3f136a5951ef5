use crate::runtime::{
    data_structures::word::{Cell, Word, WordRef},
    interpreter::{Machine, WordManagement},
};
use std::rc::Rc;

/// Check if the cell refers to the given built-in word.
fn is_builtin(cell: &Cell, builtin: &Option<WordRef>) -> bool {
    match (cell, builtin) {
        (Cell::Word(word), Some(builtin)) => Rc::ptr_eq(word, builtin),
        _ => false,
    }
}

/// Source text that pushes the given cell's word reference while interpreting.
fn word_reference_tokens(name: &str) -> Vec<String> {
    vec![
        "word".to_string(),
        name.to_string(),
        "word_from_name".to_string(),
        "drop".to_string(),
    ]
}

/// Turn a composite word's thread back into source tokens that, compiled between `: name` and `;`,
/// produce a word that behaves the same way.
///
/// * `lit x` pairs become just `x`,
/// * other literal cells become `[ x ] ,`,
/// * normal words become their name,
/// * immediate words are compiled back in with `,` so they are not run at compile time,
/// * the trailing `exit` added by `;` is dropped.
///
/// Words are written by name, so a reference to a definition that has since been replaced will
/// compile to the replacement.  Strings that contain whitespace, are empty, or look like numbers,
/// booleans or defined words do not survive the trip either.
pub fn decompile(machine: &Machine, word: &Word) -> Vec<String> {
    let lit = machine.builtin("lit").ok();
    let exit = machine.builtin("exit").ok();

    let Some(cells) = word.cells() else {
        return Vec::new();
    };

    let mut tokens = Vec::with_capacity(cells.len());
    let mut index = 0;

    while index < cells.len() {
        let cell = &cells[index];

        if is_builtin(cell, &lit) && index + 1 < cells.len() {
            match &cells[index + 1] {
                Cell::Literal(value) => tokens.push(value.to_string()),
                Cell::Word(target) if target.is_immediate() => {
                    tokens.push("lit".to_string());
                    tokens.push("[".to_string());
                    tokens.extend(word_reference_tokens(target.name()));
                    tokens.push("]".to_string());
                    tokens.push(",".to_string());
                }

                Cell::Word(target) => {
                    tokens.push("lit".to_string());
                    tokens.push(target.name().clone());
                }
            }

            index += 2;
            continue;
        }

        if is_builtin(cell, &exit) && index + 1 == cells.len() {
            break;
        }

        match cell {
            Cell::Word(target) if target.is_immediate() => {
                tokens.push("[".to_string());
                tokens.extend(word_reference_tokens(target.name()));
                tokens.push("]".to_string());
                tokens.push(",".to_string());
            }

            Cell::Word(target) => tokens.push(target.name().clone()),

            Cell::Literal(value) => {
                tokens.push("[".to_string());
                tokens.push(value.to_string());
                tokens.push("]".to_string());
                tokens.push(",".to_string());
            }
        }

        index += 1;
    }

    tokens
}

/// Full source of a definition, as printed by `see`.
pub fn definition_source(machine: &Machine, word: &Word) -> String {
    if word.is_primitive() {
        return format!("{} is a native word.  {}", word.name(), word.description());
    }

    let mut source = format!(": {}", word.name());

    for token in decompile(machine, word) {
        source.push(' ');
        source.push_str(&token);
    }

    source.push_str(" ;");

    if word.is_immediate() {
        source.push_str(" immediate");
    }

    source
}

/// Pretty print a thread one cell per line with its index, for debugging.
pub fn pretty_print_code(word: &Word) -> String {
    use std::fmt::Write;

    let Some(cells) = word.cells() else {
        return format!("{}: <native>\n", word.name());
    };

    let mut result = String::with_capacity(cells.len() * 20);

    for (index, cell) in cells.iter().enumerate() {
        let _ = match cell {
            Cell::Word(target) => writeln!(&mut result, "{:4}: {}", index, target.name()),
            Cell::Literal(value) => writeln!(&mut result, "{:4}: {:?}", index, value),
        };
    }

    result
}
