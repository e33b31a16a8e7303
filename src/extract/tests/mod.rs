mod field_tests;
mod html_tests;
mod text_tests;
