pub(crate) mod diagram;
pub(crate) mod dsl;
pub(crate) mod ids;
pub(crate) mod model;
