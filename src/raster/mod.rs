pub(crate) mod backup;
pub(crate) mod buffer;
pub(crate) mod codec;
pub(crate) mod present;
