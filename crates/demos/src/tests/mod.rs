/// Editor shell tests.
mod editor;
