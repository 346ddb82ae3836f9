pub mod admin;
pub mod auth;
pub mod bot;
pub mod docs;
pub mod domain;
pub mod param;
pub mod seller;
pub mod storefront;
pub mod transcript;

#[cfg(test)]
mod test;
