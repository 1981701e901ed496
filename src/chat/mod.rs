pub mod composer;
pub mod schemas;
pub mod session;
pub mod timeline;
