pub(crate) mod store;
pub(crate) mod texture;
