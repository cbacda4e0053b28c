pub mod prelude;

pub mod categories;
pub mod products;
pub mod reviews;
pub mod users;
