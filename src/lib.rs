pub mod data;
pub mod encoding;
pub mod parser;
pub mod solver;
