pub(crate) mod compositor;
pub(crate) mod overlay;
pub(crate) mod stage;
