pub mod remap;

pub type VarspliceResult<T> = anyhow::Result<T>;
