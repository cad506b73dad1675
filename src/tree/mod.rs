mod resolve;
mod update;

pub use resolve::{locate, resolve, resolve_or_root};
pub use update::{apply_at, merge};
