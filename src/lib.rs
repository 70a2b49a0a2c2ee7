//! tinycc-shorten: tiny.cc URL shortener adapter with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
