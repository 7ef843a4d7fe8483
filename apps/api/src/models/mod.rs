pub mod document;
pub mod user_data;

pub use document::{AssembledDocument, DocumentSection};
pub use user_data::UserData;
