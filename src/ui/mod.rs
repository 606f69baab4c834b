pub mod app_shell;
pub mod preview;
pub mod records_tab;
pub mod upload_tab;
