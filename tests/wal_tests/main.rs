//! WAL test suite

mod reader_tests;
