pub(crate) mod blur;
pub(crate) mod buffer;
pub(crate) mod mask;
pub(crate) mod snapshot;
