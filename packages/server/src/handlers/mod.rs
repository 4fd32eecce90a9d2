pub mod identify;
pub mod pages;
