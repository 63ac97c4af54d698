mod common;
mod editor;
