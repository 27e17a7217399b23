pub(crate) mod mockup_session;
