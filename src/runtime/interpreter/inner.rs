use std::rc::Rc;
use tracing::trace;
use crate::runtime::{ data_structures::{ program_counter::Pc,
                                         stack::{ Frame,
                                                  ReturnStack },
                                         word::{ Cell,
                                                 WordBody,
                                                 WordHandler,
                                                 WordRef } },
                      error::{ self,
                               MachineError },
                      interpreter::{ Machine,
                                     ThreadManagement,
                                     WordManagement } };



impl ThreadManagement for Machine
{
    fn pc(&self) -> Option<&Pc>
    {
        self.pc.as_ref()
    }

    fn return_stack(&self) -> &ReturnStack
    {
        &self.return_stack
    }

    fn push_frame(&mut self, frame: Frame)
    {
        self.return_stack.push(frame);
    }

    fn pop_frame(&mut self) -> error::Result<Frame>
    {
        self.return_stack.pop()
    }

    fn execute(&mut self, word: &WordRef) -> error::Result<()>
    {
        if self.pc.is_none() && self.executing.is_none()
        {
            self.fault = None;
        }

        match word.body()
        {
            WordBody::Primitive(handler) =>
                {
                    let handler = handler.clone();
                    self.invoke(word, handler)
                },

            WordBody::Composite(_) =>
                {
                    match self.pc.take()
                    {
                        // Descend through the return stack, the running loop picks the callee up.
                        Some(caller) =>
                            {
                                self.return_stack.push(Frame::Call(caller));
                                self.pc = Some(Pc::new(word.clone()));

                                Ok(())
                            },

                        None => self.run_composite(word)
                    }
                }
        }
    }

    fn fetch_operand(&mut self) -> error::Result<Cell>
    {
        self.pc.as_mut().ok_or(MachineError::NoActiveThread)?.fetch_and_advance()
    }

    fn jump(&mut self, offset: i64) -> error::Result<()>
    {
        self.pc.as_mut().ok_or(MachineError::NoActiveThread)?.jump(offset)
    }

    fn exit_thread(&mut self) -> error::Result<()>
    {
        if self.pc.is_none()
        {
            return Err(MachineError::NoActiveThread);
        }

        if self.return_stack.len() <= self.run_base
        {
            self.pc = None;
            return Ok(());
        }

        match self.return_stack.pop()?
        {
            Frame::Call(caller) =>
                {
                    self.pc = Some(caller);
                    Ok(())
                },

            Frame::Value(value) =>
                Err(MachineError::UnknownCell(format!("return stack value {}", value)))
        }
    }
}


impl Machine
{
    /// Invoke a native word's handler, keeping track of which word is executing for error
    /// reporting.
    fn invoke(&mut self, word: &WordRef, handler: Rc<WordHandler>) -> error::Result<()>
    {
        let previous = self.executing.replace(word.clone());
        let result = (*handler)(self);

        if result.is_err() && self.fault.is_none()
        {
            self.fault = Some(self.call_stack());
        }

        self.executing = previous;
        result
    }

    /// Start a new run of a composite word with no thread running, and keep stepping until the
    /// word returns.
    fn run_composite(&mut self, word: &WordRef) -> error::Result<()>
    {
        let saved_base = self.run_base;

        self.run_base = self.return_stack.len();
        self.pc = Some(Pc::new(word.clone()));

        let result = self.run();

        if result.is_err() && self.fault.is_none()
        {
            self.fault = Some(self.call_stack());
        }

        self.pc = None;
        self.run_base = saved_base;

        result
    }

    /// The fetch and dispatch loop.  Runs until the thread started by run_composite returns, or
    /// something goes wrong.
    fn run(&mut self) -> error::Result<()>
    {
        loop
        {
            let Some(pc) = self.pc.as_mut() else
                {
                    return Ok(());
                };

            // Running off the end of a thread is the same as an exit.
            if pc.is_exhausted()
            {
                self.exit_thread()?;
                continue;
            }

            let index = pc.index();
            let cell = pc.fetch_and_advance()?;

            trace!(word = %pc.word().name(),
                   index,
                   cell = %cell,
                   depth = self.stack.len(),
                   return_depth = self.return_stack.len(),
                   "step");

            match cell
            {
                Cell::Word(word)     => self.execute(&word)?,
                Cell::Literal(value) => self.stack.push(value)
            }
        }
    }
}
