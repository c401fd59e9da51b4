//! Decides which frame slots must survive a suspension.
//!
//! Ops are split into segments at every suspend op. A slot touched in more
//! than one segment, or anywhere inside a loop whose body suspends, is
//! lifted. All other slots are transient: the machine clears them whenever
//! it suspends.
//!
//! Linear segment numbering over-approximates control flow (two branches of
//! an `if` get different numbers), which only ever lifts more slots.

use std::collections::BTreeSet;

use crate::program::{Op, Program, Slot};

/// Slots one op reads or writes
struct OpSlots {
    /// Touched in the op's own segment
    used: Vec<Slot>,
    /// Written on resume, i.e. in the following segment
    bound: Option<Slot>,
}

fn op_slots(op: &Op) -> OpSlots {
    let mut used = Vec::new();
    let mut bound = None;
    match op {
        Op::Assign(slot, value) => {
            used.push(*slot);
            value.for_each_slot(&mut |s| used.push(s));
        }
        Op::Eval(value) | Op::Return(value) | Op::Throw(value) | Op::JumpUnless(value, _) => {
            value.for_each_slot(&mut |s| used.push(s));
        }
        Op::Yield { value, bind, .. } => {
            value.for_each_slot(&mut |s| used.push(s));
            bound = *bind;
        }
        Op::Delegate { source, bind, .. } => {
            source.for_each_slot(&mut |s| used.push(s));
            bound = *bind;
        }
        Op::Jump(_) | Op::EndFinally(_) => {}
    }
    OpSlots { used, bound }
}

/// Fill in [`Program::lifted`]
pub fn analyze(program: &mut Program) {
    let mut segments: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); program.slot_count()];
    for param in segments.iter_mut().take(program.param_count) {
        param.insert(0);
    }

    let mut segment = 0;
    let mut op_segment = Vec::with_capacity(program.ops.len());
    for op in &program.ops {
        op_segment.push(segment);
        let slots = op_slots(op);
        for slot in slots.used {
            segments[slot.index()].insert(segment);
        }
        if let Some(slot) = slots.bound {
            segments[slot.index()].insert(segment + 1);
        }
        if op.is_suspend() {
            segment += 1;
        }
    }

    // catch bindings are written when control enters the handler
    for region in &program.regions {
        if let Some(handler) = &region.handler {
            if let Some(slot) = handler.slot {
                let entry = op_segment.get(handler.range.start).copied().unwrap_or(segment);
                segments[slot.index()].insert(entry);
            }
        }
    }

    let mut lifted: Vec<bool> = segments.iter().map(|s| s.len() > 1).collect();

    for (pc, op) in program.ops.iter().enumerate() {
        let Op::Jump(target) = op else { continue };
        if *target > pc {
            continue;
        }
        let body = &program.ops[*target..=pc];
        if !body.iter().any(Op::is_suspend) {
            continue;
        }
        for op in body {
            let slots = op_slots(op);
            for slot in slots.used.into_iter().chain(slots.bound) {
                lifted[slot.index()] = true;
            }
        }
    }

    program.lifted = lifted;
}
