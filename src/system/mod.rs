pub mod command;
pub mod drive;
#[cfg(test)]
pub(crate) mod fake;
pub mod toc;
