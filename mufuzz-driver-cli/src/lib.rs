use std::iter;

macro_rules! opts {
    (
        $all:ident where
        $($ident:ident = $name:expr);* $(;)?
    ) => {
        $(pub const $ident: &str = $name;)*
        pub const $all: &[&str] = &[$($ident,)*];
    };
}

pub mod mutation_operators {
    opts! { ALL where
        JUMP_COND_INVERT = "jump_cond_invert";
        JUMP_FORCE_TAKEN = "jump_force_taken";
        JUMP_FORCE_NOT_TAKEN = "jump_force_not_taken";
        CONST_LOAD_PERTURB = "const_load_perturb";
        CONST_LOAD_STRING_ALTER = "const_load_string_alter";
        BOOL_CONST_FLIP = "bool_const_flip";
        MATH_OP_ADD_SUB_SWAP = "math_op_add_sub_swap";
        MATH_OP_MUL_DIV_SWAP = "math_op_mul_div_swap";
        MATH_OP_DIV_REM_SWAP = "math_op_div_rem_swap";
        IINC_NEGATE = "iinc_negate";
        CALL_VOID_DELETE = "call_void_delete";
        CALL_VALUE_DEFAULT = "call_value_default";
    }
}

fn mutation_operators_arg() -> clap::Arg {
    clap::arg!(--"mutation-operators" [MUTATION_OPERATORS] "Mutation operators to consider, separated by commas.")
        .value_delimiter(',')
        .value_parser(iter::once(&"all").chain(mutation_operators::ALL).copied().collect::<Vec<_>>())
        .default_value("all")
}

pub fn command() -> clap::Command {
    clap::command!("mufuzz")
        .propagate_version(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .styles({
            use clap::builder::styling::*;
            Styles::styled()
                .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightGreen))).bold())
                .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightGreen))).bold())
                .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlue))).bold())
                .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlue))))
        })
        // Subcommands
        .subcommand(clap::Command::new("print-opportunities")
            .display_order(1)
            .about("Print the number of mutation opportunities of each operator in a unit.")
            .arg(clap::arg!(<UNIT> "Name of the unit to inspect."))
            .arg(mutation_operators_arg())
        )
        .subcommand(clap::Command::new("print-mutants")
            .display_order(2)
            .about("Print every mutant of a unit, with the instruction it rewrites.")
            .arg(clap::arg!(<UNIT> "Name of the unit to inspect."))
            .arg(mutation_operators_arg())
        )
        .subcommand(clap::Command::new("mutate")
            .display_order(3)
            .about("Rewrite a single opportunity of a unit.")
            .arg(clap::arg!(<UNIT> "Name of the unit to mutate."))
            .arg(clap::arg!(--operator <OPERATOR> "Mutation operator to apply.").value_parser(mutation_operators::ALL.to_vec()))
            .arg(clap::arg!(--ordinal <ORDINAL> "Zero-based index of the opportunity to rewrite.").value_parser(clap::value_parser!(u64)))
            .arg(clap::arg!(--out [OUT] "Write the rewritten unit to the given path instead of stdout.").value_parser(clap::value_parser!(std::path::PathBuf)))
            .arg(clap::arg!(--diff "Print a diff of the unit listings instead of the rewritten unit."))
        )
        .subcommand(clap::Command::new("merge")
            .display_order(4)
            .about("Merge registry snapshots into one.")
            .arg(clap::arg!(<SNAPSHOTS> ... "Registry snapshots to merge, in order.").value_parser(clap::value_parser!(std::path::PathBuf)))
            .arg(clap::arg!(--out <OUT> "Path to write the merged snapshot to.").value_parser(clap::value_parser!(std::path::PathBuf)))
        )
        // Arguments
        .arg(clap::arg!(--"unit-path" [UNIT_PATH] "Directory to look up units in.").default_value(".").value_parser(clap::value_parser!(std::path::PathBuf)).global(true).display_order(100))
        .arg(clap::arg!(-v --verbose "Print more verbose information during execution.").action(clap::ArgAction::Count).global(true).display_order(100))
        // Information
        .arg(clap::arg!(-h --help "Print help information; this message or the help of the given subcommand.").action(clap::ArgAction::Help).global(true))
        .arg(clap::arg!(-V --version "Print version information.").action(clap::ArgAction::Version).global(true))
}
