/// Test utils.
pub(crate) mod test;
