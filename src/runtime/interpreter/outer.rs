use std::{ fs::read_to_string,
           rc::Rc };
use tracing::{ debug,
               warn };
use crate::{ lang::{ source_buffer::{ CharSource,
                                      SourceBuffer },
                     tokenizing::{ tokenize_from_source,
                                   Token,
                                   TokenSource },
                     translation::translate },
             runtime::{ data_structures::{ value::Value,
                                           word::{ Cell,
                                                   Word,
                                                   WordRef,
                                                   WordRuntime } },
                        error::{ self,
                                 MachineError,
                                 ScriptError },
                        interpreter::{ CodeManagement,
                                       Machine,
                                       ThreadManagement,
                                       WordManagement } } };



/// What the outer interpreters do when running a token fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnError
{
    /// Give the error back to the caller.  Used when running scripts.
    Stop,

    /// Print the error, throw away the rest of the input line and keep going.  Used by the repl.
    ReportAndContinue
}


impl CodeManagement for Machine
{
    fn next_token(&mut self) -> Option<Token>
    {
        let token = self.input.next_token()?;

        self.current_location = Some(token.location().clone());
        Some(token)
    }

    fn next_token_text(&mut self) -> error::Result<String>
    {
        self.next_token()
            .map(Token::into_text)
            .ok_or(MachineError::EndOfInput)
    }

    fn next_char(&mut self) -> Option<char>
    {
        self.input.next_char()
    }

    fn set_input(&mut self, input: Box<dyn TokenSource>) -> Box<dyn TokenSource>
    {
        std::mem::replace(&mut self.input, input)
    }

    fn is_interpreting(&self) -> bool
    {
        self.interpreting
    }

    fn set_interpreting(&mut self, interpreting: bool)
    {
        if self.interpreting != interpreting
        {
            debug!(interpreting, "compile state changed");
        }

        self.interpreting = interpreting;
    }

    fn under_construction(&self) -> error::Result<WordRef>
    {
        self.under_construction.clone().ok_or(MachineError::NothingDefined)
    }

    fn create_word(&mut self, name: &str) -> WordRef
    {
        let location = self.current_location.clone().unwrap_or_default();
        let word = Rc::new(Word::new_composite(name.to_string(), location));

        debug!(name, "creating word");

        self.dictionary.define(word.clone());
        self.under_construction = Some(word.clone());

        word
    }

    fn compile_cell(&mut self, cell: Cell) -> error::Result<()>
    {
        self.under_construction()?.append(cell)
    }

    fn compile_word(&mut self, name: &str, definition: &str, runtime: WordRuntime) -> WordRef
    {
        let cells = tokenize_from_source(name, definition)
            .iter()
            .map(|token| Cell::from_value(translate(&self.dictionary, token.text())))
            .collect();

        let location = self.current_location.clone().unwrap_or_default();
        let word = Rc::new(Word::with_cells(name.to_string(), location, cells));

        if runtime == WordRuntime::Immediate
        {
            word.mark_immediate();
        }

        self.dictionary.define(word.clone());
        word
    }

    fn process_token(&mut self, token: Token) -> error::Result<()>
    {
        let value = translate(&self.dictionary, token.text());
        self.process_value(value)
    }

    fn process_value(&mut self, value: Value) -> error::Result<()>
    {
        match value
        {
            Value::Word(word) =>
                {
                    if self.interpreting || word.is_immediate()
                    {
                        self.execute(&word)
                    }
                    else
                    {
                        self.compile_cell(Cell::Word(word))
                    }
                },

            value =>
                {
                    if self.interpreting
                    {
                        self.stack.push(value);
                        Ok(())
                    }
                    else
                    {
                        let lit = self.builtin("lit")?;

                        self.compile_cell(Cell::Word(lit))?;
                        self.compile_cell(Cell::Literal(value))
                    }
                }
        }
    }

    fn process_source(&mut self, path: &str, source: &str) -> error::ScriptResult<()>
    {
        let previous = self.set_input(Box::new(SourceBuffer::new(path, source)));
        let result = self.interpret(OnError::Stop);

        let _ = self.set_input(previous);
        result
    }

    fn process_source_file(&mut self, path: &str) -> error::ScriptResult<()>
    {
        let source = read_to_string(path)
            .map_err(|error| ScriptError::new(None,
                                              MachineError::Io(format!("could not read {}: {}",
                                                                       path,
                                                                       error)),
                                              None))?;

        self.process_source(path, &source)
    }

    fn interpret(&mut self, on_error: OnError) -> error::ScriptResult<()>
    {
        while !self.finished
        {
            let Some(token) = self.next_token() else
                {
                    break;
                };

            if let Err(error) = self.process_token(token)
            {
                self.handle_error(error, on_error)?;
            }
        }

        Ok(())
    }

    fn boot(&mut self, on_error: OnError) -> error::ScriptResult<()>
    {
        let init = self.builtin("init")?;

        while !self.finished
        {
            match self.execute(&init)
            {
                Ok(()) => break,
                Err(error) => self.handle_error(error, on_error)?
            }
        }

        Ok(())
    }
}


impl Machine
{
    /// Turn a failed run into a report and put the machine back into a state where it can carry on.
    pub fn recover(&mut self, error: MachineError) -> ScriptError
    {
        let report = ScriptError::new(self.current_location.clone(), error, self.fault.take());

        warn!(error = %report.error(), location = ?report.location(), "run aborted");

        self.reset_run_state();
        report
    }

    fn handle_error(&mut self, error: MachineError, on_error: OnError) -> error::ScriptResult<()>
    {
        let report = self.recover(error);

        match on_error
        {
            OnError::Stop => Err(report),

            OnError::ReportAndContinue =>
                {
                    eprintln!("Error: {}", report);
                    self.input.discard_line();

                    Ok(())
                }
        }
    }
}
