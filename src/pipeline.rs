pub(crate) mod compose;
pub(crate) mod config;
pub(crate) mod layer;
pub(crate) mod lock;
pub(crate) mod present;
pub(crate) mod refresh;
