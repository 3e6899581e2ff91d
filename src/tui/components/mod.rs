// Components module - the building blocks of the screen
//
// - Chat pane: the transcript, painted through the chat renderer
// - Logs panel: debug pane with recent log entries
// - Input bar: prompt plus the line being typed

pub mod chat_pane;
pub mod input_bar;
pub mod logs_panel;

pub use chat_pane::ChatPane;
