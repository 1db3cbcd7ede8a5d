pub mod enumerator;
pub mod matcher;

pub use enumerator::PrefixEntries;
pub use matcher::{is_prefix_match, keys_equal};
