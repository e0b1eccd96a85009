pub mod mutants;
pub mod registry;

/// Version number of the format described by this version of the crate.
///
/// Consumers of mufuzz JSON data must validate that
/// the format version of the JSON data matches
/// the format version described by this crate.
pub const FORMAT_VERSION: u32 = 1;
