use mufuzz_emit::{MutCtxt, Operator};
use mufuzz_emit::codegen::rewrite;
use mufuzz_emit::insn::Unit;
use similar::TextDiff;

pub fn print_opportunities(unit: &Unit, operators: &[&dyn Operator]) {
    let name_w = operators.iter().map(|operator| operator.name().len()).max().unwrap_or(0);

    let mut total = 0;
    for operator in operators {
        let count = rewrite::count_opportunities(unit, *operator);
        total += count;

        println!("{name:name_w$}  {count}",
            name = operator.name(),
        );
    }
    println!();

    println!("opportunities: {total} total in `{unit}`",
        unit = unit.name,
    );
}

/// One line per mutant of `unit`, in operator and then ordinal order.
pub fn mutant_lines(unit: &Unit, operators: &[&dyn Operator]) -> Vec<String> {
    let mut lines = vec![];

    for operator in operators {
        for (ordinal, location) in rewrite::opportunities(unit, *operator).into_iter().enumerate() {
            let method = &unit.methods[location.method_idx];
            let mcx = MutCtxt { unit, method, insn: &method.insns[location.insn_idx], location };

            lines.push(format!("{op_name}#{ordinal}: {method}@{insn_idx}: {display_name}",
                op_name = operator.name(),
                method = method.name,
                insn_idx = location.insn_idx,
                display_name = operator.display_name(&mcx),
            ));
        }
    }

    lines
}

pub fn print_mutants(unit: &Unit, operators: &[&dyn Operator]) {
    let lines = mutant_lines(unit, operators);
    for line in &lines {
        println!("{line}");
    }
    println!();

    println!("mutants: {total} total in `{unit}`",
        total = lines.len(),
        unit = unit.name,
    );
}

/// Unified diff between the listings of the original and the rewritten unit.
pub fn listing_diff(original: &Unit, rewritten: &Unit) -> String {
    let original_listing = mufuzz_emit::print::unit_listing(original);
    let rewritten_listing = mufuzz_emit::print::unit_listing(rewritten);

    let diff = TextDiff::from_lines(&original_listing, &rewritten_listing);
    diff.unified_diff().context_radius(3).header("original", "mutant").to_string()
}
