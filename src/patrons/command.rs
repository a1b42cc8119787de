pub mod add_patron_cmd;
pub mod get_patron_cmd;
pub mod list_patrons_cmd;
pub mod remove_patron_cmd;
