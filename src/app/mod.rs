// Application layer: concrete providers plus the text front end (form, view, shell).

pub mod forms;
pub mod providers;
pub mod shell;
pub mod view;
