//! Lowered generator programs: flat ops over frame slots

use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use core_types::Value;

use crate::ast::{BinaryOp, HostFunction};
use crate::function::GeneratorFunction;

/// Frame slot identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(pub u32);

impl Slot {
    /// Index into the frame
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Expression with names resolved to slots
#[derive(Debug, Clone)]
pub enum Operand {
    /// Literal value
    Const(Value),
    /// Read a slot
    Load(Slot),
    /// Binary operation
    Binary(BinaryOp, Box<Operand>, Box<Operand>),
    /// Logical not
    Not(Box<Operand>),
    /// Array literal
    Array(Vec<Operand>),
    /// Host function call
    Call(HostFunction, Vec<Operand>),
    /// Instantiate another compiled generator
    Spawn(Rc<GeneratorFunction>, Vec<Operand>),
}

impl Operand {
    /// Visit every slot this operand reads
    pub fn for_each_slot(&self, f: &mut impl FnMut(Slot)) {
        match self {
            Operand::Const(_) => {}
            Operand::Load(slot) => f(*slot),
            Operand::Binary(_, lhs, rhs) => {
                lhs.for_each_slot(f);
                rhs.for_each_slot(f);
            }
            Operand::Not(inner) => inner.for_each_slot(f),
            Operand::Array(items) | Operand::Call(_, items) | Operand::Spawn(_, items) => {
                for item in items {
                    item.for_each_slot(f);
                }
            }
        }
    }
}

/// A lowered instruction
#[derive(Debug, Clone)]
pub enum Op {
    /// Store the operand's value into a slot
    Assign(Slot, Operand),
    /// Evaluate for effect
    Eval(Operand),
    /// Suspend with a value; on resume the sent value goes to `bind`
    Yield {
        /// Suspend point ordinal (1-based)
        point: usize,
        /// Value to emit
        value: Operand,
        /// Destination of the sent value
        bind: Option<Slot>,
    },
    /// Suspend and delegate to the iterable; its final value goes to `bind`
    Delegate {
        /// Suspend point ordinal (1-based)
        point: usize,
        /// Iterable to drain
        source: Operand,
        /// Destination of the final value
        bind: Option<Slot>,
    },
    /// Unconditional jump
    Jump(usize),
    /// Jump when the operand is falsy
    JumpUnless(Operand, usize),
    /// Complete with a value (after running enclosing finally blocks)
    Return(Operand),
    /// Raise the operand's value
    Throw(Operand),
    /// End of a finally block: resume the completion that entered it, if any
    EndFinally(usize),
}

impl Op {
    /// Whether this op suspends the generator
    pub fn is_suspend(&self) -> bool {
        matches!(self, Op::Yield { .. } | Op::Delegate { .. })
    }
}

/// Catch handler of a try region
#[derive(Debug, Clone, PartialEq)]
pub struct Handler {
    /// Slot receiving the caught value
    pub slot: Option<Slot>,
    /// Handler ops
    pub range: Range<usize>,
}

/// Static description of one `try` statement
#[derive(Debug, Clone, PartialEq)]
pub struct TryRegion {
    /// Index in [`Program::regions`]
    pub id: usize,
    /// Number of enclosing try statements
    pub depth: usize,
    /// Protected ops
    pub body: Range<usize>,
    /// Catch clause
    pub handler: Option<Handler>,
    /// Finally ops, including the closing `EndFinally`
    pub finalizer: Option<Range<usize>>,
}

impl TryRegion {
    /// Every op belonging to this statement
    pub fn span(&self) -> Range<usize> {
        let end = self
            .finalizer
            .as_ref()
            .map(|r| r.end)
            .or_else(|| self.handler.as_ref().map(|h| h.range.end))
            .unwrap_or(self.body.end);
        self.body.start..end
    }
}

/// A compiled generator body
#[derive(Debug, Clone)]
pub struct Program {
    /// Generator name
    pub name: String,
    /// Instructions
    pub ops: Vec<Op>,
    /// Declared name of every slot
    pub slot_names: Vec<String>,
    /// Parameters occupy the first slots
    pub param_count: usize,
    /// Slots kept across suspensions; the rest are cleared at each one
    pub lifted: Vec<bool>,
    /// Op index of each suspend point (point `k` is at index `k - 1`)
    pub suspend_points: Vec<usize>,
    /// Try statements, outer ones first
    pub regions: Vec<TryRegion>,
}

impl Program {
    /// Number of frame slots
    pub fn slot_count(&self) -> usize {
        self.slot_names.len()
    }

    /// Number of suspend points
    pub fn suspend_count(&self) -> usize {
        self.suspend_points.len()
    }

    /// Names of the lifted slots
    pub fn lifted_names(&self) -> Vec<&str> {
        self.slot_names
            .iter()
            .zip(&self.lifted)
            .filter(|(_, lifted)| **lifted)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Whether the named slot survives suspensions
    pub fn is_lifted(&self, name: &str) -> bool {
        self.lifted_names().contains(&name)
    }

    /// Try regions enclosing `pc`, innermost first
    pub fn enclosing_regions(&self, pc: usize) -> Vec<&TryRegion> {
        let mut regions: Vec<&TryRegion> = self
            .regions
            .iter()
            .filter(|r| r.span().contains(&pc))
            .collect();
        regions.sort_by(|a, b| b.depth.cmp(&a.depth));
        regions
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "function* {} ({} slots)", self.name, self.slot_count())?;
        for (pc, op) in self.ops.iter().enumerate() {
            writeln!(f, "{:4}  {:?}", pc, op)?;
        }
        Ok(())
    }
}
