//! Single-site rewriting of a unit's instruction stream.
//!
//! Opportunities are numbered per operator in program order: methods in declaration order,
//! instructions in stream order within each method. The instruction holding the requested
//! ordinal is replaced; every other instruction is re-emitted as is. Independently of the
//! operator, a guard check is planted before every control transfer.

use smallvec::SmallVec;

use crate::codegen::guard;
use crate::codegen::mutation::{MutCtxt, MutLoc, MutationSite, Operator};
use crate::insn::{Insn, Method, Unit};

#[derive(Clone, Debug)]
pub struct Rewrite {
    pub unit: Unit,
    /// Total number of opportunities for the operator in the unit.
    pub opportunities: u64,
    /// [`None`] iff the requested ordinal is past the last opportunity.
    pub mutation: Option<MutationSite>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct RewriteState {
    seen_count: u64,
}

struct Emitted {
    state: RewriteState,
    insns: SmallVec<[Insn; 3]>,
    mutation: Option<MutationSite>,
}

fn is_opportunity(operator: &dyn Operator, mcx: &MutCtxt) -> bool {
    // The planted guard checks must never be counted, should a stream be rewritten twice.
    if guard::is_guard_check(mcx.insn) { return false; }

    mcx.insn.category() == operator.category() && operator.is_opportunity(mcx)
}

fn rewrite_insn(mcx: &MutCtxt, operator: &dyn Operator, ordinal: u64, state: RewriteState) -> Emitted {
    let mut insns = SmallVec::new();

    if mcx.insn.is_control_transfer() {
        insns.push(guard::mk_guard_check());
    }

    if !is_opportunity(operator, mcx) {
        insns.push(mcx.insn.clone());
        return Emitted { state, insns, mutation: None };
    }

    let next_state = RewriteState { seen_count: state.seen_count + 1 };

    if state.seen_count != ordinal {
        insns.push(mcx.insn.clone());
        return Emitted { state: next_state, insns, mutation: None };
    }

    let replacement = operator.replace_with(mcx, mcx.is_static_call_site());
    insns.extend(replacement.iter().cloned());

    let mutation = MutationSite {
        op_name: operator.name(),
        method: mcx.method.name.clone(),
        location: mcx.location,
        original: mcx.insn.clone(),
        replacement,
        display_name: operator.display_name(mcx),
    };

    Emitted { state: next_state, insns, mutation: Some(mutation) }
}

fn rewrite_method(unit: &Unit, method_idx: usize, method: &Method, operator: &dyn Operator, ordinal: u64, mut state: RewriteState) -> (Method, RewriteState, Option<MutationSite>) {
    let mut insns = Vec::with_capacity(method.insns.len());
    let mut mutation = None;

    for (insn_idx, insn) in method.insns.iter().enumerate() {
        let mcx = MutCtxt { unit, method, insn, location: MutLoc { method_idx, insn_idx } };

        let emitted = rewrite_insn(&mcx, operator, ordinal, state);
        insns.extend(emitted.insns);
        if emitted.mutation.is_some() { mutation = emitted.mutation; }
        state = emitted.state;
    }

    let method = Method {
        name: method.name.clone(),
        descriptor: method.descriptor.clone(),
        is_static: method.is_static,
        insns,
    };

    (method, state, mutation)
}

/// Rewrites the `ordinal`-th opportunity of `operator` in `unit`.
///
/// An ordinal past the last opportunity is not an error: the result then differs from the
/// original only by the planted guard checks.
pub fn rewrite(unit: &Unit, operator: &dyn Operator, ordinal: u64) -> Rewrite {
    let mut state = RewriteState::default();
    let mut mutation = None;
    let mut methods = Vec::with_capacity(unit.methods.len());

    for (method_idx, method) in unit.methods.iter().enumerate() {
        let (method, next_state, method_mutation) = rewrite_method(unit, method_idx, method, operator, ordinal, state);
        methods.push(method);
        if method_mutation.is_some() { mutation = method_mutation; }
        state = next_state;
    }

    let rewritten_unit = Unit { name: unit.name.clone(), methods };

    Rewrite { unit: rewritten_unit, opportunities: state.seen_count, mutation }
}

/// Locations of all opportunities of `operator` in `unit`, in program order.
pub fn opportunities(unit: &Unit, operator: &dyn Operator) -> Vec<MutLoc> {
    let mut locations = vec![];

    for (method_idx, method) in unit.methods.iter().enumerate() {
        for (insn_idx, insn) in method.insns.iter().enumerate() {
            let mcx = MutCtxt { unit, method, insn, location: MutLoc { method_idx, insn_idx } };
            if is_opportunity(operator, &mcx) {
                locations.push(mcx.location);
            }
        }
    }

    locations
}

pub fn count_opportunities(unit: &Unit, operator: &dyn Operator) -> u64 {
    opportunities(unit, operator).len() as u64
}

/// Reconstructs the original stream of a rewritten unit by dropping the planted guard checks.
///
/// Only meaningful for rewrites that replaced nothing.
pub fn strip_guard_checks(unit: &Unit) -> Unit {
    Unit {
        name: unit.name.clone(),
        methods: unit.methods.iter()
            .map(|method| Method {
                name: method.name.clone(),
                descriptor: method.descriptor.clone(),
                is_static: method.is_static,
                insns: method.insns.iter().filter(|insn| !guard::is_guard_check(insn)).cloned().collect(),
            })
            .collect(),
    }
}
