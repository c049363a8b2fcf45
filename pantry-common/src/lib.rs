#![cfg(not(doctest))]

#[macro_use]
extern crate diesel;

pub mod db;
pub mod friendcode;
pub mod messages;
pub mod models;
pub mod schema;
pub mod threadrand;
