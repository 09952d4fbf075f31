pub(crate) mod partition;
pub(crate) mod polygon;
pub(crate) mod sampler;
