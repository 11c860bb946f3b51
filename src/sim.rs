//! Simulated probe and clock for driver tests.
//!
//! The probe keeps a byte register file and applies the effect of a task
//! command only once the shared clock has advanced past the command's
//! completion time, like the real firmware does.

use std::cell::Cell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

/// Fake monotonic clock, advanced only by delays.
#[derive(Clone, Default)]
pub struct Clock(Rc<Cell<u64>>);

impl Clock {
    pub fn now_ns(&self) -> u64 {
        self.0.get()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ns() / 1_000_000
    }
}

impl DelayNs for Clock {
    fn delay_ns(&mut self, ns: u32) {
        self.0.set(self.0.get() + u64::from(ns));
    }
}

/// Register change made by the firmware when a command completes.
#[derive(Clone, Copy, Debug)]
pub enum Effect {
    Float(u8, f32),
    /// Adopt the float in the given register as the new bus address.
    Address(u8),
}

/// What the firmware does for one task code.
#[derive(Clone, Debug)]
pub struct Response {
    code: u8,
    after_ms: u64,
    effects: Vec<Effect>,
}

impl Response {
    pub fn new(code: u8, after_ms: u64, effects: &[Effect]) -> Self {
        Self {
            code,
            after_ms,
            effects: effects.to_vec(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Write { at_ms: u64, bytes: Vec<u8> },
    Read { at_ms: u64, offset: u8 },
    Command { at_ms: u64, code: u8, regs: [u8; 64] },
}

pub struct SimProbe {
    clock: Clock,
    addr: u8,
    task_register: u8,
    regs: [u8; 64],
    cursor: usize,
    responses: Vec<Response>,
    pending: Vec<(u64, Vec<Effect>)>,
    pub log: Vec<Event>,
}

impl SimProbe {
    pub fn new(clock: Clock, task_register: u8) -> Self {
        Self {
            clock,
            addr: 0x3c,
            task_register,
            regs: [0; 64],
            cursor: 0,
            responses: Vec::new(),
            pending: Vec::new(),
            log: Vec::new(),
        }
    }

    #[must_use]
    pub fn respond(mut self, response: Response) -> Self {
        self.responses.push(response);
        self
    }

    pub fn address(&self) -> u8 {
        self.addr
    }

    pub fn set_float(&mut self, offset: u8, value: f32) {
        let at = usize::from(offset);
        self.regs[at..at + 4].copy_from_slice(&value.to_be_bytes());
    }

    pub fn float(&self, offset: u8) -> f32 {
        let at = usize::from(offset);
        let mut bytes = [0; 4];
        bytes.copy_from_slice(&self.regs[at..at + 4]);
        f32::from_be_bytes(bytes)
    }

    pub fn set_byte(&mut self, offset: u8, value: u8) {
        self.regs[usize::from(offset)] = value;
    }

    pub fn byte(&self, offset: u8) -> u8 {
        self.regs[usize::from(offset)]
    }

    /// Commands seen so far with the register file at the moment they were
    /// issued.
    pub fn commands(&self) -> Vec<(u64, u8, [u8; 64])> {
        self.log
            .iter()
            .filter_map(|e| match e {
                Event::Command { at_ms, code, regs } => Some((*at_ms, *code, *regs)),
                _ => None,
            })
            .collect()
    }

    /// Every write with its time and payload.
    pub fn writes(&self) -> Vec<(u64, Vec<u8>)> {
        self.log
            .iter()
            .filter_map(|e| match e {
                Event::Write { at_ms, bytes } => Some((*at_ms, bytes.clone())),
                _ => None,
            })
            .collect()
    }

    /// Time of every read starting at `offset`.
    pub fn reads_of(&self, offset: u8) -> Vec<u64> {
        self.log
            .iter()
            .filter_map(|e| match e {
                Event::Read { at_ms, offset: o, .. } if *o == offset => Some(*at_ms),
                _ => None,
            })
            .collect()
    }

    fn complete_due(&mut self) {
        let now = self.clock.now_ms();
        let (due, waiting): (Vec<_>, Vec<_>) = self.pending.drain(..).partition(|(at, _)| *at <= now);
        self.pending = waiting;

        for (_, effects) in due {
            for effect in effects {
                match effect {
                    Effect::Float(offset, value) => self.set_float(offset, value),
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    Effect::Address(offset) => self.addr = self.float(offset) as u8,
                }
            }
        }
    }

    fn write(&mut self, bytes: &[u8]) {
        let now = self.clock.now_ms();
        self.log.push(Event::Write {
            at_ms: now,
            bytes: bytes.to_vec(),
        });

        let Some((&offset, data)) = bytes.split_first() else {
            return;
        };
        self.cursor = usize::from(offset);

        if offset == self.task_register && data.len() == 1 {
            let code = data[0];
            self.log.push(Event::Command {
                at_ms: now,
                code,
                regs: self.regs,
            });
            if let Some(r) = self.responses.iter().find(|r| r.code == code) {
                self.pending.push((now + r.after_ms, r.effects.clone()));
            }
        }

        for (i, b) in data.iter().enumerate() {
            self.regs[self.cursor + i] = *b;
        }
    }

    fn read(&mut self, buf: &mut [u8]) {
        self.log.push(Event::Read {
            at_ms: self.clock.now_ms(),
            offset: u8::try_from(self.cursor).unwrap_or(u8::MAX),
        });

        for b in buf.iter_mut() {
            *b = self.regs[self.cursor];
            self.cursor += 1;
        }
    }
}

impl ErrorType for SimProbe {
    type Error = ErrorKind;
}

impl I2c for SimProbe {
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        self.complete_due();
        if address != self.addr {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        for op in operations {
            match op {
                Operation::Write(bytes) => self.write(bytes),
                Operation::Read(buf) => self.read(buf),
            }
        }
        Ok(())
    }
}
