pub mod firestore;
pub mod models;

pub use firestore::{CodecError, Document};
