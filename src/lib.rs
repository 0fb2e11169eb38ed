#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]

pub mod codec;
pub mod common;
pub mod database;
pub mod row;
pub mod schema;
pub mod table;
pub mod table_files;
pub mod value;
