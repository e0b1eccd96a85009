pub mod codec;
pub mod codegen;
pub mod insn;
pub mod print;

pub use codegen::mutation::{MutCtxt, MutLoc, MutationSite, Operator};

pub use smallvec;
