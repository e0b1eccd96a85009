pub mod guard;
pub mod mutation;
pub mod rewrite;
