//! # TUI Components
//!
//! Everything drawn on the chat screen.
//!
//! ## Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: app name, current user, status and "↓ New"
//! - `Message`: one chat message (author, text, avatar reference)
//!
//! ## Stateful Components (Event-Driven)
//!
//! - `InputBox`: controlled compose input; owns only its cursor
//! - `MessageList`: scrollable list with a persistent `MessageListState`
//!
//! Components receive data as props (struct fields or constructor
//! arguments), never by reaching into global state. `MessageList` renders
//! one `Message` per record.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── message.rs       (Single message renderer)
//! ├── message_list.rs  (Scrollable message container)
//! └── input_box/       (Compose input + cursor layout)
//! ```

pub mod input_box;
pub mod message;
pub mod message_list;
pub mod title_bar;

pub use input_box::{InputBox, InputEvent};
pub use message::{Message, Variant};
pub use message_list::{MessageList, MessageListState};
pub use title_bar::TitleBar;
