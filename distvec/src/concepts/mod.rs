pub mod event;
pub mod packet;
pub mod route;
