mod common;

use mufuzz_emit::codec::{Codec, JsonCodec};
use mufuzz_emit::codegen::guard;
use mufuzz_emit::insn::{mk, Insn, JumpOp, LabelId};
use mufuzz_operators::{IincNegate, JumpCondInvert, JumpForceTaken};
use mufuzz_runtime::config::Options;
use mufuzz_runtime::{run_trial, MemorySource, Mutant, MutantLoader, MutantRegistry, TimeoutPolicy, TrialOutcome};

const MAX_STEPS: u64 = 1_000;

fn loader() -> MutantLoader<MemorySource> {
    let bytes = JsonCodec.encode(&common::count_unit()).unwrap();
    MutantLoader::with_json_codec(MemorySource::new().with_unit("demo/Loop", bytes))
}

fn conditional_jumps(insns: &[Insn]) -> Vec<Insn> {
    insns.iter()
        .filter(|insn| matches!(insn, Insn::Jump { op, .. } if op.is_conditional()))
        .cloned()
        .collect()
}

#[test]
fn test_invert_middle_jump() {
    let loader = loader();
    let opts = Options { max_steps: MAX_STEPS };
    let mutant = Mutant::new(&JumpCondInvert, 1, "demo/Loop", &opts);

    let loaded = loader.load(&mutant, "demo/Loop").unwrap();
    assert_eq!(loaded.opportunities, Some(3));

    let insns = &loaded.unit.as_ref().unwrap().methods[0].insns;
    assert_eq!(conditional_jumps(insns), vec![
        mk::jump(JumpOp::IfIcmpge, LabelId(1)),
        mk::jump(JumpOp::Ifge, LabelId(3)),
        mk::jump(JumpOp::Ifge, LabelId(4)),
    ]);

    // A guard check precedes each of the four jumps, `goto` included.
    assert_eq!(insns.iter().filter(|insn| guard::is_guard_check(insn)).count(), 4);
    for (idx, insn) in insns.iter().enumerate() {
        if let Insn::Jump { .. } = insn {
            assert!(guard::is_guard_check(&insns[idx - 1]));
        }
    }

    // The loop no longer advances and only the step guard ends the trial.
    let unit = loaded.unit.clone().unwrap();
    let outcome = run_trial(&mutant, TimeoutPolicy::Ignore, |mutant| {
        let result = common::run(mutant, &unit, "count", &[5])?;
        Ok(result != 5)
    });
    let TrialOutcome::TimedOut(fault) = &outcome else { panic!("expected timeout, got {outcome:?}"); };
    assert_eq!(fault.mutant, *mutant.id());
    assert_eq!(fault.max_steps, MAX_STEPS);

    // Not a kill without an explicit policy.
    assert!(!mutant.is_dead());
    let mut registry = MutantRegistry::new();
    registry.record_seen(mutant.id());
    assert!(!registry.record_outcome(mutant.id(), &outcome, TimeoutPolicy::Ignore));
    assert_eq!(registry.caught_count(), 0);
}

#[test]
fn test_unmutated_run_counts_steps() {
    let loader = loader();
    let opts = Options { max_steps: 17 };
    // Past the last opportunity: only guard checks are planted.
    let mutant = Mutant::new(&JumpCondInvert, 3, "demo/Loop", &opts);

    let loaded = loader.load(&mutant, "demo/Loop").unwrap();
    assert!(loaded.mutation.is_none());

    let unit = loaded.unit.clone().unwrap();
    let outcome = run_trial(&mutant, TimeoutPolicy::Ignore, |mutant| Ok(common::run(mutant, &unit, "count", &[5])? != 5));
    assert_eq!(outcome, TrialOutcome::Survived);
    assert_eq!(mutant.guard().steps(), 17);

    // One more iteration exceeds the ceiling.
    let outcome = run_trial(&mutant, TimeoutPolicy::Ignore, |mutant| Ok(common::run(mutant, &unit, "count", &[6])? != 6));
    assert!(matches!(outcome, TrialOutcome::TimedOut(_)));
}

#[test]
fn test_kills_recorded_per_mutant() {
    let loader = loader();
    let opts = Options { max_steps: MAX_STEPS };

    let mutants = [
        Mutant::new(&JumpCondInvert, 0, "demo/Loop", &opts),
        Mutant::new(&JumpForceTaken, 2, "demo/Loop", &opts),
        Mutant::new(&IincNegate, 0, "demo/Loop", &opts),
    ];

    let mut registry = MutantRegistry::new();
    for mutant in &mutants {
        let unit = loader.load(mutant, "demo/Loop").unwrap().unit.clone().unwrap();
        registry.record_seen(mutant.id());

        let outcome = run_trial(mutant, TimeoutPolicy::Ignore, |mutant| Ok(common::run(mutant, &unit, "count", &[5])? != 5));
        registry.record_outcome(mutant.id(), &outcome, TimeoutPolicy::Ignore);
    }

    // Exiting at once returns 0. Forcing the final branch does not change the result for n = 5.
    // Counting down never reaches n and times out.
    assert!(mutants[0].is_dead());
    assert!(!mutants[1].is_dead());
    assert!(!mutants[2].is_dead());
    assert_eq!(registry.caught_snapshot(), vec![mutants[0].id().clone()]);
    assert_eq!(registry.seen_count(), 3);
}
