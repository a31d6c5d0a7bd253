pub mod installation;
pub mod token;

pub use installation::Installation;
pub use token::{mint_token, TokenIdentity};
