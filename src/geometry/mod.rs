pub(crate) mod connector;
pub(crate) mod layout;
pub(crate) mod projection;
