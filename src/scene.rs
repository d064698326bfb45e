pub(crate) mod file;
pub(crate) mod position;
pub(crate) mod tree;
