pub mod generate;
pub mod inspect;
pub mod package_loader;
pub mod types;

#[cfg(test)]
mod types_tests;
