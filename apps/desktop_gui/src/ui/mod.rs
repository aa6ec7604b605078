//! UI layer for desktop GUI: app shell, workflow and dashboard screens, painted backdrop.

pub mod app;
pub mod background;

pub use app::PatentDesktopApp;
