pub mod client;
pub mod graphql;
pub mod movies;
