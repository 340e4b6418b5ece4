pub mod catalog_testkit;
