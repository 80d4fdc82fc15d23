pub mod example;
pub mod generate;
