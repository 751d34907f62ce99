//! Terminal UI layer for the chat shell.
//!
//! - [`chat_loop`]: the event loop, key handling and command executors.
//! - [`renderer`] and [`layout`]: frame composition from
//!   [`crate::core::app::App`].
//! - [`markdown`] and [`theme`]: how message text is styled.
//!
//! This layer only presents state and turns input into actions; the state
//! machine itself lives in [`crate::core::app`].

pub mod chat_loop;
pub mod layout;
pub mod markdown;
pub mod renderer;
pub mod theme;
