//! Welcome to the land of The Great Dispatch Loop
//!
//! Tokens are decoded straight from the source as they are executed, jumps
//! just move the lexer cursor.

use {
    super::{
        host::{Emit, HostIo},
        Vm, VmRunError, VmRunOk,
    },
    core::fmt::Write,
    esobytecode::Op,
    esolang::{Label, Param, Token},
};

impl<H: HostIo, const TIMER_QUOTIENT: usize> Vm<'_, H, TIMER_QUOTIENT> {
    /// Execute program
    ///
    /// Stops at the end of the source, at an exit instruction or, with a
    /// non-zero `TIMER_QUOTIENT`, every that many instructions.
    pub fn run(&mut self) -> Result<VmRunOk, VmRunError> {
        loop {
            let Some(Token { op, param, end }) = self.lexer.next_token()? else {
                log::debug!("end of source, {} values left on the stack", self.stack.len());
                return Ok(VmRunOk::End);
            };
            log::trace!("[{end:04}] {op} {param:?} {:?}", self.stack);

            match (op, &param) {
                (Op::PUSH, &Param::Number(n)) => self.stack.push(n),
                (Op::DUP, _) => {
                    let top = *self.stack.last().ok_or(VmRunError::StackUnderflow)?;
                    self.stack.push(top);
                }
                (Op::COPY, &Param::Number(n)) => {
                    let value = usize::try_from(n)
                        .ok()
                        .and_then(|n| self.stack.iter().rev().nth(n))
                        .ok_or(VmRunError::StackUnderflow)?;
                    self.stack.push(*value);
                }
                (Op::SWAP, _) => {
                    let len = self.stack.len();
                    if len < 2 {
                        return Err(VmRunError::StackUnderflow);
                    }
                    self.stack.swap(len - 1, len - 2);
                }
                (Op::POP, _) => _ = self.pop()?,
                (Op::SLIDE, &Param::Number(n)) => {
                    let top = self.pop()?;
                    // Negative counts keep everything
                    let n = usize::try_from(n).unwrap_or(0);
                    let keep =
                        self.stack.len().checked_sub(n).ok_or(VmRunError::StackUnderflow)?;
                    self.stack.truncate(keep);
                    self.stack.push(top);
                }
                (Op::ADD, _) => self.binary_op(|a, b| Ok(a.wrapping_add(b)))?,
                (Op::SUB, _) => self.binary_op(|a, b| Ok(a.wrapping_sub(b)))?,
                (Op::MUL, _) => self.binary_op(|a, b| Ok(a.wrapping_mul(b)))?,
                (Op::DIV, _) => self.binary_op(|a, b| match b {
                    0 => Err(VmRunError::DivideByZero),
                    _ => Ok(a.wrapping_div(b)),
                })?,
                (Op::MOD, _) => self.binary_op(|a, b| match b {
                    0 => Err(VmRunError::DivideByZero),
                    _ => Ok(a.wrapping_rem(b)),
                })?,
                (Op::STORE, _) => {
                    let value = self.pop()?;
                    let address = self.pop()?;
                    self.heap.insert(address, value);
                }
                (Op::RETR, _) => {
                    let address = self.pop()?;
                    let value = *self
                        .heap
                        .get(&address)
                        .ok_or(VmRunError::UndefinedHeapAddress(address))?;
                    self.stack.push(value);
                }
                // Registered by the pre-pass, where the last definition won
                (Op::LABEL, Param::Label(label)) => log::trace!("passing label {label}"),
                (Op::CALL, Param::Label(label)) => {
                    self.call_stack.push(end);
                    self.jump(label)?;
                }
                (Op::JMP, Param::Label(label)) => self.jump(label)?,
                (Op::JZ, Param::Label(label)) => {
                    if self.pop()? == 0 {
                        self.jump(label)?;
                    }
                }
                (Op::JN, Param::Label(label)) => {
                    if self.pop()? < 0 {
                        self.jump(label)?;
                    }
                }
                (Op::RET, _) => {
                    let target = self.call_stack.pop().ok_or(VmRunError::CallStackUnderflow)?;
                    self.seek(target)?;
                }
                (Op::EXIT, _) => {
                    log::debug!("exit at {end}");
                    self.lexer.seek_end();
                    return Ok(VmRunOk::Exit);
                }
                (Op::OUTCHAR, _) => {
                    let value = self.pop()?;
                    let c = u32::try_from(value)
                        .ok()
                        .and_then(char::from_u32)
                        .ok_or(VmRunError::InvalidCharacter(value))?;
                    self.host.emit_char(c);
                }
                (Op::OUTNUM, _) => {
                    let value = self.pop()?;
                    // `Emit` never fails
                    _ = write!(Emit(&mut self.host), "{value}");
                }
                (Op::READCHAR, _) => {
                    let address = self.pop()?;
                    let c = self.host.read_char().ok_or(VmRunError::EndOfInput)?;
                    self.heap.insert(address, c as i64);
                }
                (Op::READNUM, _) => {
                    let address = self.pop()?;
                    let line = self.host.read_line().ok_or(VmRunError::EndOfInput)?;
                    let value =
                        line.trim().parse().map_err(|_| VmRunError::InvalidNumericInput)?;
                    self.heap.insert(address, value);
                }
                // The lexer decodes the parameter kind of the instruction table
                _ => return Err(VmRunError::MalformedInstruction { offset: end }),
            }

            if TIMER_QUOTIENT != 0 {
                self.timer = self.timer.wrapping_add(1);
                if self.timer % TIMER_QUOTIENT == 0 {
                    return Ok(VmRunOk::Timer);
                }
            }
        }
    }

    #[inline]
    fn pop(&mut self) -> Result<i64, VmRunError> {
        self.stack.pop().ok_or(VmRunError::StackUnderflow)
    }

    /// Pop the right then the left operand and push `op(left, right)`
    #[inline]
    fn binary_op(
        &mut self,
        op: impl Fn(i64, i64) -> Result<i64, VmRunError>,
    ) -> Result<(), VmRunError> {
        let b = self.pop()?;
        let a = self.pop()?;
        self.stack.push(op(a, b)?);
        Ok(())
    }

    fn jump(&mut self, label: &Label) -> Result<(), VmRunError> {
        let target = self.labels.resolve(label)?;
        log::debug!("jump to {label} at {target}");
        self.seek(target)
    }

    /// Resume after the token ending at `target`
    ///
    /// Label targets and return addresses all come from the pre-pass, so the
    /// boundary check is an invariant assertion; it cannot fail for targets
    /// produced by this engine.
    fn seek(&mut self, target: usize) -> Result<(), VmRunError> {
        if !self.labels.is_boundary(target) {
            return Err(VmRunError::MalformedInstruction { offset: target });
        }
        self.lexer.seek(target + 1);
        Ok(())
    }
}
