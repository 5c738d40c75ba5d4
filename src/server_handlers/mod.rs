pub mod chat;
pub mod docs;
pub mod paginas;
pub mod sessoes;

pub use chat::*;
pub use docs::*;
pub use paginas::*;
pub use sessoes::*;
