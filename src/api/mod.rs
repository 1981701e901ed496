pub mod contract;
pub mod rest;
