pub mod delegates;
