pub mod command;
pub mod controller;
pub mod domain;
pub mod library;
pub mod locks;
pub mod repository;
pub mod server;
