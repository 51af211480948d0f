pub mod token_list;
pub mod version;

pub use token_list::{TokenEntry, TokenListDocument};
pub use version::{Version, VersionUpgrade};
