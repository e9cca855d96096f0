pub mod multipart;
pub mod path;
