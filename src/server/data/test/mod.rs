mod bot;
mod domain;
mod port;
mod session;
