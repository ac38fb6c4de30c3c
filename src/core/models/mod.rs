pub mod cell;
pub mod keyword;
