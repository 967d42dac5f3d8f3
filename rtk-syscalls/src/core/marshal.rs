//! Argument marshalling
//!
//! Kernel side: [`SlotReader`] and [`unmarshal`] turn the raw slot bank into
//! typed arguments following a descriptor's packing scheme, and [`invoke`]
//! runs the verification function with them. Caller side: [`ArgPacker`]
//! lays typed arguments out into slots.
//!
//! Slots past a call's arity are never read.

use rtk_api::syscall::{ARG_SLOTS, Arg, ArgKind, CallFrame, RetKind, SyscallWords, split_wide};
use rtk_api::{Error, Result, SyscallId, UserPtr, Word};

use super::context::ExecContext;
use super::fault::Fault;
use super::table::CallDescriptor;
use crate::kobject::ObjectRegistry;

/// Typed arguments of one call
pub type TypedArgs = heapless::Vec<Arg, ARG_SLOTS>;

/// Sequential reader over a slot bank
#[derive(Debug)]
pub struct SlotReader<'w> {
    words: &'w SyscallWords,
    next: usize,
}

impl<'w> SlotReader<'w> {
    pub fn new(words: &'w SyscallWords) -> Self {
        Self { words, next: 0 }
    }

    /// Take the next slot
    pub fn take(&mut self) -> Option<Word> {
        let word = self.words.get(self.next)?;
        self.next += 1;
        Some(word)
    }

    /// Take the slots of one argument of `kind`
    pub fn read(&mut self, kind: ArgKind) -> Option<Arg> {
        let lo = self.take()?;
        let hi = match kind {
            ArgKind::Wide => self.take()?,
            ArgKind::Scalar | ArgKind::Pointer => 0,
        };
        Some(Arg::decode(kind, lo, hi))
    }

    /// Slots taken so far
    pub fn consumed(&self) -> usize {
        self.next
    }
}

/// Decode the arguments of `desc` from `words`
pub fn unmarshal(desc: &CallDescriptor, words: &SyscallWords) -> ::core::result::Result<TypedArgs, Fault> {
    let mut reader = SlotReader::new(words);
    let mut args = TypedArgs::new();
    for &kind in desc.args {
        let arg = reader.read(kind).ok_or(Fault::BadSignature { id: desc.id })?;
        args.push(arg).map_err(|_| Fault::BadSignature { id: desc.id })?;
    }
    debug_assert_eq!(reader.consumed(), desc.arity());
    Ok(args)
}

/// Everything a verification function gets to see
#[derive(Debug)]
pub struct Invocation<'a> {
    id: SyscallId,
    caller: &'a ExecContext,
    objects: &'a ObjectRegistry,
    args: &'a [Arg],
}

impl<'a> Invocation<'a> {
    pub fn new(
        id: SyscallId,
        caller: &'a ExecContext,
        objects: &'a ObjectRegistry,
        args: &'a [Arg],
    ) -> Self {
        Self { id, caller, objects, args }
    }

    pub fn id(&self) -> SyscallId {
        self.id
    }

    /// Context that trapped
    pub fn caller(&self) -> &'a ExecContext {
        self.caller
    }

    /// Kernel objects the call may refer to
    pub fn objects(&self) -> &'a ObjectRegistry {
        self.objects
    }

    /// Decoded arguments, in declaration order
    pub fn args(&self) -> &'a [Arg] {
        self.args
    }

    /// Fault for a call whose arguments do not match what the verification
    /// function expects
    pub fn bad_signature(&self) -> Fault {
        Fault::BadSignature { id: self.id }
    }

    /// Fault for a check that cannot be reported through the result word
    pub fn oops(&self, reason: &'static str) -> Fault {
        Fault::Oops { id: self.id, reason }
    }
}

/// Run one call: attach the frame, decode, verify and convert the result
///
/// The frame stays attached to `ctx` exactly as long as the verification
/// function runs.
pub fn invoke(
    desc: &CallDescriptor,
    objects: &ObjectRegistry,
    ctx: &mut ExecContext,
    words: &SyscallWords,
    frame: CallFrame,
) -> ::core::result::Result<Word, Fault> {
    let call = ctx.enter(desc.id, frame);
    let args = unmarshal(desc, words)?;
    let invocation = Invocation::new(desc.id, call.context(), objects, &args);
    let ret = (desc.verify)(&invocation)?;
    debug_assert!(
        ret.fits(desc.ret),
        "{} declared {:?} but returned {:?}",
        desc.name,
        desc.ret,
        ret
    );
    call.complete();
    Ok(ret.into_word())
}

/// A packed call ready to trap with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyscallRequest {
    pub id: SyscallId,
    pub words: SyscallWords,
    /// How to read the result word
    pub ret: RetKind,
}

/// Caller-side builder for a slot bank
#[derive(Debug, Default)]
pub struct ArgPacker {
    words: SyscallWords,
    used: usize,
    kinds: heapless::Vec<ArgKind, ARG_SLOTS>,
    overflow: bool,
}

impl ArgPacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a word-sized integer
    pub fn scalar(self, value: Word) -> Self {
        self.push(ArgKind::Scalar, &[value])
    }

    /// Append a pointer
    pub fn pointer(self, ptr: UserPtr) -> Self {
        self.push(ArgKind::Pointer, &[ptr.as_word()])
    }

    /// Append a 64-bit integer as two slots, low half first
    pub fn wide(self, value: u64) -> Self {
        let (lo, hi) = split_wide(value);
        self.push(ArgKind::Wide, &[lo, hi])
    }

    /// Append an already typed argument
    pub fn arg(self, arg: Arg) -> Self {
        match arg {
            Arg::Scalar(value) => self.scalar(value),
            Arg::Pointer(ptr) => self.pointer(ptr),
            Arg::Wide(value) => self.wide(value),
        }
    }

    fn push(mut self, kind: ArgKind, slots: &[Word]) -> Self {
        if self.overflow || self.used + slots.len() > ARG_SLOTS || self.kinds.push(kind).is_err() {
            self.overflow = true;
            return self;
        }
        self.words.0[self.used..self.used + slots.len()].copy_from_slice(slots);
        self.used += slots.len();
        self
    }

    /// Slots filled so far
    pub fn slots_used(&self) -> usize {
        self.used
    }

    /// Check the packed arguments against `desc` and produce the request
    pub fn finish(self, desc: &CallDescriptor) -> Result<SyscallRequest> {
        if self.overflow {
            return Err(Error::TooManySlots);
        }
        let position = self
            .kinds
            .iter()
            .zip(desc.args)
            .position(|(packed, declared)| packed != declared)
            .or_else(|| {
                (self.kinds.len() != desc.args.len())
                    .then(|| self.kinds.len().min(desc.args.len()))
            });
        if let Some(position) = position {
            return Err(Error::SignatureMismatch { id: desc.id, position });
        }
        Ok(SyscallRequest { id: desc.id, words: self.words, ret: desc.ret })
    }
}
