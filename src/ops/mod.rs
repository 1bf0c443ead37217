pub(crate) mod elementwise;
pub(crate) mod region;
