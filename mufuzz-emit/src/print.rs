use std::fmt::Write;

use crate::insn::{Insn, Unit};

/// Assembler-style listing of a unit, used for inspection and for diffing rewrites.
pub fn unit_listing(unit: &Unit) -> String {
    let mut out = String::new();

    // NOTE: Writing into a `String` cannot fail.
    let _ = writeln!(out, "unit {}", unit.name);
    for method in &unit.methods {
        let _ = writeln!(out);
        let _ = writeln!(out, "method {static_marker}{name}{descriptor}",
            static_marker = if method.is_static { "static " } else { "" },
            name = method.name,
            descriptor = method.descriptor,
        );

        for (insn_idx, insn) in method.insns.iter().enumerate() {
            match insn {
                Insn::Label { .. } => { let _ = writeln!(out, "  {insn}"); }
                _ => { let _ = writeln!(out, "    {insn_idx:>4}: {insn}"); }
            }
        }
    }

    out
}
