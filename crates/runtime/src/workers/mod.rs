//! Background workers owned by the runtime.
mod authority;

pub use authority::AuthorityWorker;
