pub mod disc;
pub mod metadata;
