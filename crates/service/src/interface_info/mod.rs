//! Interface metadata management: request shapes, storage and the application service.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::InterfaceInfoService;
