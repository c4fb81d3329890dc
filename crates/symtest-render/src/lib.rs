pub mod driver;
pub mod jest;
pub mod literal;
