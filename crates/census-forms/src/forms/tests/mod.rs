mod common;
mod simple_forms;
