pub mod book;
pub mod person;

pub use book::{Book, NewBook};
pub use person::{NewPerson, Person};
