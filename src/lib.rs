pub mod response;

pub mod config;
pub mod database;
pub mod libs;
pub mod pages;

pub use config::Config;
pub use response::Response;

pub type ResponseResult = Result<Response, Response>;
