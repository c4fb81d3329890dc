pub mod parse;
pub mod record;
pub mod value;
