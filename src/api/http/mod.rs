pub mod auth;
pub mod books;
pub mod collections;
pub mod comments;
pub mod friends;
pub mod hitokoto;
pub mod images;
pub mod posts;
pub mod tags;
